use std::sync::Arc;

use models::user::{self as rules, Role};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewUser, User, UserPatch, UserSummary};
use super::repository::{Guarded, UserRepository};
use crate::errors::ServiceError;
use crate::store::StoreError;
use crate::validation::Violations;

const ENTITY: &str = "user";
const LAST_ADMIN: &str = "cannot remove the last administrator";

fn taken(field: &'static str) -> ServiceError {
    let message = match field {
        "username" => "username already exists",
        "national_id" => "national id already registered",
        _ => "user already exists",
    };
    ServiceError::conflict(field, message)
}

fn write_failed(e: StoreError) -> ServiceError {
    match e {
        StoreError::UniqueViolation { field } => {
            warn!(field, "user uniqueness claimed by a concurrent write");
            taken(field)
        }
        StoreError::Backend(msg) => {
            error!(error = %msg, "user write failed");
            ServiceError::Internal(msg)
        }
    }
}

/// User administration service independent of web framework
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a user after checking `username`, then `national_id`, for clashes.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::user::Role;
    /// use service::users::{domain::NewUser, repository::mock::MockUserRepository, UserService};
    ///
    /// let svc = UserService::new(Arc::new(MockUserRepository::default()));
    /// let input = NewUser { full_name: "Ana Diaz".into(), username: "ana".into(), national_id: "12345678".into(), role: Role::Hr };
    /// let user = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(user.role, Role::Hr);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create(&self, input: NewUser) -> Result<User, ServiceError> {
        let mut v = Violations::new();
        v.check(rules::validate_full_name(&input.full_name));
        v.check(rules::validate_username(&input.username));
        v.check(rules::validate_national_id(&input.national_id));
        v.finish()?;

        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(taken("username"));
        }
        if self.repo.find_by_national_id(&input.national_id).await?.is_some() {
            return Err(taken("national_id"));
        }

        let user = self.repo.insert(input.into_user(Uuid::new_v4())).await.map_err(write_failed)?;
        info!(user_id = %user.id, role = %user.role, "user_created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<User, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, ServiceError> {
        Ok(self.repo.list().await?.into_iter().map(UserSummary::from).collect())
    }

    /// Apply the fields present in `patch`. Demoting the only administrator is
    /// refused like deleting it.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ServiceError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut v = Violations::new();
        v.check_present(patch.full_name.as_deref(), rules::validate_full_name);
        v.check_present(patch.username.as_deref(), rules::validate_username);
        v.check_present(patch.national_id.as_deref(), rules::validate_national_id);
        v.finish()?;

        if let Some(username) = patch.username.as_deref().filter(|u| *u != current.username) {
            if self.repo.find_by_username(username).await?.is_some_and(|u| u.id != id) {
                return Err(taken("username"));
            }
        }
        if let Some(nid) = patch.national_id.as_deref().filter(|n| *n != current.national_id) {
            if self.repo.find_by_national_id(nid).await?.is_some_and(|u| u.id != id) {
                return Err(taken("national_id"));
            }
        }

        let user = match self.repo.update(id, &patch).await.map_err(write_failed)? {
            Guarded::Applied(user) => user,
            Guarded::NotFound => return Err(ServiceError::not_found(ENTITY)),
            Guarded::LastAdmin => {
                warn!(user_id = %id, "refused to demote the last administrator");
                return Err(ServiceError::InvariantViolation(LAST_ADMIN.into()));
            }
        };
        info!(user_id = %id, "user_updated");
        Ok(user)
    }

    /// Delete a user; the last administrator cannot be removed. The admin count
    /// and the delete happen in one storage step.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.repo.delete(id).await.map_err(write_failed)? {
            Guarded::Applied(()) => {
                info!(user_id = %id, "user_deleted");
                Ok(())
            }
            Guarded::NotFound => Err(ServiceError::not_found(ENTITY)),
            Guarded::LastAdmin => {
                warn!(user_id = %id, "refused to delete the last administrator");
                Err(ServiceError::InvariantViolation(LAST_ADMIN.into()))
            }
        }
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.repo.count().await?)
    }

    /// Create `admin` when no administrator exists. Returns the created user,
    /// or `None` when one was already present.
    #[instrument(skip(self, admin), fields(username = %admin.username))]
    pub async fn ensure_default_admin(&self, admin: NewUser) -> Result<Option<User>, ServiceError> {
        if self.repo.count_by_role(Role::Admin).await? > 0 {
            debug!("administrator already present");
            return Ok(None);
        }
        let admin = NewUser { role: Role::Admin, ..admin };
        match self.create(admin).await {
            Ok(user) => {
                info!(user_id = %user.id, "default_admin_created");
                Ok(Some(user))
            }
            Err(e @ ServiceError::Conflict { .. }) => {
                // another instance may have bootstrapped concurrently
                if self.repo.count_by_role(Role::Admin).await? > 0 {
                    Ok(None)
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;
    use crate::users::repository::mock::MockUserRepository;

    fn svc() -> (Arc<MockUserRepository>, UserService<MockUserRepository>) {
        let repo = Arc::new(MockUserRepository::default());
        (repo.clone(), UserService::new(repo))
    }

    fn conflict_field(e: ServiceError) -> &'static str {
        match e {
            ServiceError::Conflict { field, .. } => field,
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_reports_which_field_clashes() {
        let (_, svc) = svc();
        svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap();

        let e = svc.create(sample_user("ana", "87654321", Role::Hr)).await.unwrap_err();
        assert_eq!(conflict_field(e), "username");
        let e = svc.create(sample_user("bob", "12345678", Role::Hr)).await.unwrap_err();
        assert_eq!(conflict_field(e), "national_id");
        // both clash: username is reported first
        let e = svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap_err();
        assert_eq!(conflict_field(e), "username");
    }

    #[tokio::test]
    async fn commit_time_clash_keeps_its_field() {
        let (repo, svc) = svc();
        svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap();
        repo.set_stale_lookups(true);
        let e = svc.create(sample_user("bob", "12345678", Role::Hr)).await.unwrap_err();
        assert_eq!(conflict_field(e), "national_id");
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let (_, svc) = svc();
        let mut input = sample_user("ana", "1234", Role::Hr);
        input.full_name = String::new();
        match svc.create(input).await.unwrap_err() {
            ServiceError::Validation(errs) => {
                let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["full_name", "national_id"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_checks_uniqueness_excluding_self() {
        let (_, svc) = svc();
        let ana = svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap();
        svc.create(sample_user("bob", "87654321", Role::Hr)).await.unwrap();

        let own = UserPatch { username: Some("ana".into()), national_id: Some("12345678".into()), ..Default::default() };
        svc.update(ana.id, own).await.unwrap();

        let e = svc.update(ana.id, UserPatch { username: Some("bob".into()), ..Default::default() }).await.unwrap_err();
        assert_eq!(conflict_field(e), "username");
        let e = svc
            .update(ana.id, UserPatch { national_id: Some("87654321".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(conflict_field(e), "national_id");

        let renamed = svc.update(ana.id, UserPatch { full_name: Some("Ana M. Diaz".into()), ..Default::default() }).await.unwrap();
        assert_eq!(renamed.full_name, "Ana M. Diaz");
        assert_eq!(renamed.username, "ana");
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted_or_demoted() {
        let (_, svc) = svc();
        let root = svc.create(sample_user("root", "00000000", Role::Admin)).await.unwrap();

        assert!(matches!(svc.delete(root.id).await, Err(ServiceError::InvariantViolation(_))));
        let demote = UserPatch { role: Some(Role::Hr), ..Default::default() };
        assert!(matches!(svc.update(root.id, demote.clone()).await, Err(ServiceError::InvariantViolation(_))));
        assert_eq!(svc.get(root.id).await.unwrap().role, Role::Admin);

        let second = svc.create(sample_user("root2", "00000001", Role::Admin)).await.unwrap();
        svc.delete(root.id).await.unwrap();
        assert!(matches!(svc.delete(second.id).await, Err(ServiceError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn non_admins_delete_freely_and_missing_is_not_found() {
        let (_, svc) = svc();
        let hr = svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap();
        svc.delete(hr.id).await.unwrap();
        assert!(matches!(svc.delete(hr.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get(hr.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_projects_summaries() {
        let (_, svc) = svc();
        svc.create(sample_user("ana", "12345678", Role::HrReadonly)).await.unwrap();
        let all = svc.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].username, "ana");
        assert_eq!(all[0].role, Role::HrReadonly);
    }

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let (_, svc) = svc();
        let admin = sample_user("admin", "00000000", Role::Hr);
        let created = svc.ensure_default_admin(admin.clone()).await.unwrap().unwrap();
        assert_eq!(created.role, Role::Admin);
        assert!(svc.ensure_default_admin(admin).await.unwrap().is_none());
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_internal() {
        let (repo, svc) = svc();
        repo.set_fail_writes(true);
        let e = svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap_err();
        assert!(matches!(e, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_username_yield_one_user() {
        let (repo, svc) = svc();
        repo.set_stale_lookups(true);
        let svc = Arc::new(svc);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = svc.clone();
                let nid = format!("{:08}", 10_000_000 + i);
                tokio::spawn(async move { svc.create(sample_user("race", &nid, Role::Hr)).await })
            })
            .collect();

        let mut ok = 0;
        let mut conflicts = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ServiceError::Conflict { field: "username", .. }) => conflicts += 1,
                Err(other) => panic!("unexpected: {other:?}"),
            }
        }
        assert_eq!((ok, conflicts), (1, 7));
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    /// Delegates to the in-memory store but stalls every read, so concurrent
    /// callers interleave between any separate count and write.
    struct SlowRepo(MockUserRepository);

    impl SlowRepo {
        async fn stall() { tokio::time::sleep(std::time::Duration::from_millis(20)).await }
    }

    #[async_trait::async_trait]
    impl UserRepository for SlowRepo {
        async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            Self::stall().await;
            self.0.get(id).await
        }
        async fn list(&self) -> Result<Vec<User>, StoreError> { self.0.list().await }
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            Self::stall().await;
            self.0.find_by_username(username).await
        }
        async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, StoreError> {
            self.0.find_by_national_id(national_id).await
        }
        async fn find_by_credentials(&self, username: &str, national_id: &str) -> Result<Option<User>, StoreError> {
            self.0.find_by_credentials(username, national_id).await
        }
        async fn count_by_role(&self, role: Role) -> Result<u64, StoreError> {
            let n = self.0.count_by_role(role).await;
            Self::stall().await;
            n
        }
        async fn count(&self) -> Result<u64, StoreError> { self.0.count().await }
        async fn insert(&self, user: User) -> Result<User, StoreError> { self.0.insert(user).await }
        async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Guarded<User>, StoreError> {
            Self::stall().await;
            self.0.update(id, patch).await
        }
        async fn delete(&self, id: Uuid) -> Result<Guarded<()>, StoreError> {
            Self::stall().await;
            self.0.delete(id).await
        }
    }

    async fn two_admins() -> (UserService<SlowRepo>, User, User) {
        let svc = UserService::new(Arc::new(SlowRepo(MockUserRepository::default())));
        let a = svc.create(sample_user("root", "00000000", Role::Admin)).await.unwrap();
        let b = svc.create(sample_user("root2", "00000001", Role::Admin)).await.unwrap();
        (svc, a, b)
    }

    fn one_refused(results: [Result<(), ServiceError>; 2]) {
        let refused = results.iter().filter(|r| matches!(r, Err(ServiceError::InvariantViolation(_)))).count();
        let applied = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!((applied, refused), (1, 1), "{results:?}");
    }

    #[tokio::test]
    async fn concurrent_deletes_of_two_admins_keep_one() {
        let (svc, a, b) = two_admins().await;
        let (ra, rb) = tokio::join!(svc.delete(a.id), svc.delete(b.id));
        one_refused([ra, rb]);
        assert_eq!(svc.repo.count_by_role(Role::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_demote_and_delete_keep_one_admin() {
        let (svc, a, b) = two_admins().await;
        let demote = UserPatch { role: Some(Role::Hr), ..Default::default() };
        let (ra, rb) = tokio::join!(svc.update(a.id, demote), svc.delete(b.id));
        one_refused([ra.map(|_| ()), rb]);
        assert_eq!(svc.repo.count_by_role(Role::Admin).await.unwrap(), 1);
    }
}
