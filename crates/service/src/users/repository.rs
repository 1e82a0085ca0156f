use async_trait::async_trait;
use models::user::Role;
use uuid::Uuid;

use super::domain::{User, UserPatch};
use crate::store::StoreError;

/// Outcome of a write that must leave at least one administrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    Applied(T),
    NotFound,
    /// The write would remove or demote the only administrator; nothing changed.
    LastAdmin,
}

/// Storage port for users. `username` and `national_id` are each unique; a
/// write that would duplicate either fails with [`StoreError::UniqueViolation`]
/// naming the field.
///
/// `update` and `delete` check the administrator count and write in one atomic
/// step, so concurrent callers cannot both remove "one of two" admins.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, StoreError>;
    /// User matching both fields, as carried by a bearer credential.
    async fn find_by_credentials(&self, username: &str, national_id: &str) -> Result<Option<User>, StoreError>;
    async fn count_by_role(&self, role: Role) -> Result<u64, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
    async fn insert(&self, user: User) -> Result<User, StoreError>;
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Guarded<User>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<Guarded<()>, StoreError>;
}

/// Simple in-memory repository for tests, doc examples and local runs
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: RwLock<Vec<User>>,
        stale_lookups: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl MockUserRepository {
        /// Make the uniqueness lookups (`find_by_username`, `find_by_national_id`) miss.
        pub fn set_stale_lookups(&self, on: bool) { self.stale_lookups.store(on, Ordering::SeqCst); }

        pub fn set_fail_writes(&self, on: bool) { self.fail_writes.store(on, Ordering::SeqCst); }

        fn check_writable(&self) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("injected write failure".into()));
            }
            Ok(())
        }

        fn stale(&self) -> bool { self.stale_lookups.load(Ordering::SeqCst) }
    }

    fn sole_admin(users: &[User], id: Uuid) -> bool { !users.iter().any(|u| u.role == Role::Admin && u.id != id) }

    fn clash(users: &[User], skip: Option<Uuid>, username: &str, national_id: &str) -> Option<&'static str> {
        let others = || users.iter().filter(move |u| Some(u.id) != skip);
        if others().any(|u| u.username == username) {
            return Some("username");
        }
        if others().any(|u| u.national_id == national_id) {
            return Some("national_id");
        }
        None
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Ok(self.users.read().await.clone())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            if self.stale() {
                return Ok(None);
            }
            Ok(self.users.read().await.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, StoreError> {
            if self.stale() {
                return Ok(None);
            }
            Ok(self.users.read().await.iter().find(|u| u.national_id == national_id).cloned())
        }

        async fn find_by_credentials(&self, username: &str, national_id: &str) -> Result<Option<User>, StoreError> {
            let users = self.users.read().await;
            Ok(users.iter().find(|u| u.username == username && u.national_id == national_id).cloned())
        }

        async fn count_by_role(&self, role: Role) -> Result<u64, StoreError> {
            Ok(self.users.read().await.iter().filter(|u| u.role == role).count() as u64)
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(self.users.read().await.len() as u64)
        }

        async fn insert(&self, user: User) -> Result<User, StoreError> {
            let mut users = self.users.write().await;
            self.check_writable()?;
            if let Some(field) = clash(&users, None, &user.username, &user.national_id) {
                return Err(StoreError::UniqueViolation { field });
            }
            users.push(user.clone());
            Ok(user)
        }

        async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Guarded<User>, StoreError> {
            let mut users = self.users.write().await;
            self.check_writable()?;
            let Some(pos) = users.iter().position(|u| u.id == id) else { return Ok(Guarded::NotFound) };
            let mut updated = users[pos].clone();
            patch.apply_to(&mut updated);
            if users[pos].role == Role::Admin && updated.role != Role::Admin && sole_admin(&users, id) {
                return Ok(Guarded::LastAdmin);
            }
            if let Some(field) = clash(&users, Some(id), &updated.username, &updated.national_id) {
                return Err(StoreError::UniqueViolation { field });
            }
            users[pos] = updated.clone();
            Ok(Guarded::Applied(updated))
        }

        async fn delete(&self, id: Uuid) -> Result<Guarded<()>, StoreError> {
            let mut users = self.users.write().await;
            self.check_writable()?;
            let Some(pos) = users.iter().position(|u| u.id == id) else { return Ok(Guarded::NotFound) };
            if users[pos].role == Role::Admin && sole_admin(&users, id) {
                return Ok(Guarded::LastAdmin);
            }
            users.remove(pos);
            Ok(Guarded::Applied(()))
        }
    }
}
