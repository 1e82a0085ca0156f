use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use models::user::{self, Role};

use crate::store::{self, backend, StoreError};
use crate::users::domain::{User, UserPatch};
use crate::users::repository::{Guarded, UserRepository};

const CONSTRAINTS: &[(&str, &str)] = &[(user::UQ_USERNAME, "username"), (user::UQ_NATIONAL_ID, "national_id")];

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, full_name: m.full_name, username: m.username, national_id: m.national_id, role: m.role }
    }
}

/// Lock every admin row (`SELECT ... FOR UPDATE`) for the rest of `txn`.
/// Guarded writes queue on these locks, and a queued reader sees rows that a
/// committed delete or demotion removed from the set as gone.
async fn lock_admins(txn: &DatabaseTransaction) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find().filter(user::Column::Role.eq(Role::Admin)).lock_exclusive().all(txn).await
}

fn sole_admin(admins: &[user::Model], id: Uuid) -> bool { !admins.iter().any(|a| a.id != id) }

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let res = user::Entity::find_by_id(id).one(&self.db).await.map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = user::Entity::find().all(&self.db).await.map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let res = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, StoreError> {
        let res = user::Entity::find()
            .filter(user::Column::NationalId.eq(national_id))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn find_by_credentials(&self, username: &str, national_id: &str) -> Result<Option<User>, StoreError> {
        let res = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::NationalId.eq(national_id))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, StoreError> {
        user::Entity::find().filter(user::Column::Role.eq(role)).count(&self.db).await.map_err(backend)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        user::Entity::find().count(&self.db).await.map_err(backend)
    }

    async fn insert(&self, u: User) -> Result<User, StoreError> {
        let am = user::ActiveModel {
            id: Set(u.id),
            full_name: Set(u.full_name),
            username: Set(u.username),
            national_id: Set(u.national_id),
            role: Set(u.role),
        };
        let txn = store::begin(&self.db).await?;
        match am.insert(&txn).await {
            Ok(model) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(model.into())
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Guarded<User>, StoreError> {
        let demotes = patch.role.is_some_and(|r| r != Role::Admin);
        let txn = store::begin(&self.db).await?;
        let admins = if demotes {
            match lock_admins(&txn).await {
                Ok(admins) => admins,
                Err(e) => return Err(store::abort(txn, e, CONSTRAINTS).await),
            }
        } else {
            Vec::new()
        };
        let found = match user::Entity::find_by_id(id).one(&txn).await {
            Ok(found) => found,
            Err(e) => return Err(store::abort(txn, e, CONSTRAINTS).await),
        };
        let Some(model) = found else {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Guarded::NotFound);
        };
        if patch.is_empty() {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Guarded::Applied(model.into()));
        }
        if demotes && model.role == Role::Admin && sole_admin(&admins, id) {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Guarded::LastAdmin);
        }
        let mut am: user::ActiveModel = model.into();
        if let Some(v) = &patch.full_name { am.full_name = Set(v.clone()); }
        if let Some(v) = &patch.username { am.username = Set(v.clone()); }
        if let Some(v) = &patch.national_id { am.national_id = Set(v.clone()); }
        if let Some(v) = patch.role { am.role = Set(v); }
        match am.update(&txn).await {
            Ok(updated) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(Guarded::Applied(updated.into()))
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Guarded<()>, StoreError> {
        let txn = store::begin(&self.db).await?;
        let admins = match lock_admins(&txn).await {
            Ok(admins) => admins,
            Err(e) => return Err(store::abort(txn, e, CONSTRAINTS).await),
        };
        let found = match user::Entity::find_by_id(id).one(&txn).await {
            Ok(found) => found,
            Err(e) => return Err(store::abort(txn, e, CONSTRAINTS).await),
        };
        let Some(model) = found else {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Guarded::NotFound);
        };
        if model.role == Role::Admin && sole_admin(&admins, id) {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Guarded::LastAdmin);
        }
        match model.delete(&txn).await {
            Ok(_) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(Guarded::Applied(()))
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, sample_user};

    fn unique_suffix() -> String { Uuid::new_v4().simple().to_string()[..8].to_string() }

    fn national_id() -> String { format!("{:08}", Uuid::new_v4().as_u128() % 100_000_000) }

    #[tokio::test]
    async fn unique_violations_name_the_field() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmUserRepository { db };
        let name = format!("u{}", unique_suffix());
        let nid = national_id();

        let first = repo.insert(sample_user(&name, &nid, Role::Hr).into_user(Uuid::new_v4())).await?;

        let same_username = sample_user(&name, &national_id(), Role::Hr).into_user(Uuid::new_v4());
        assert_eq!(repo.insert(same_username).await.unwrap_err(), StoreError::UniqueViolation { field: "username" });

        let same_nid = sample_user(&format!("u{}", unique_suffix()), &nid, Role::Hr).into_user(Uuid::new_v4());
        assert_eq!(repo.insert(same_nid).await.unwrap_err(), StoreError::UniqueViolation { field: "national_id" });

        let found = repo.find_by_credentials(&name, &nid).await?.unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.find_by_credentials(&name, "00000001").await?.is_none());

        let patch = UserPatch { role: Some(Role::HrReadonly), ..Default::default() };
        match repo.update(first.id, &patch).await? {
            Guarded::Applied(u) => assert_eq!(u.role, Role::HrReadonly),
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(repo.delete(first.id).await?, Guarded::Applied(()));
        assert_eq!(repo.delete(first.id).await?, Guarded::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_admin_deletes_keep_one_admin() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = std::sync::Arc::new(SeaOrmUserRepository { db });
        let a = repo.insert(sample_user(&format!("a{}", unique_suffix()), &national_id(), Role::Admin).into_user(Uuid::new_v4())).await?;
        let b = repo.insert(sample_user(&format!("a{}", unique_suffix()), &national_id(), Role::Admin).into_user(Uuid::new_v4())).await?;

        let (ra, rb) = tokio::join!(repo.delete(a.id), repo.delete(b.id));
        let (ra, rb) = (ra?, rb?);
        assert!(repo.count_by_role(Role::Admin).await? >= 1);
        assert!(ra == Guarded::Applied(()) || rb == Guarded::Applied(()));

        // leave no admins from this test behind when others remain
        for id in [a.id, b.id] {
            let _ = repo.delete(id).await?;
        }
        Ok(())
    }
}
