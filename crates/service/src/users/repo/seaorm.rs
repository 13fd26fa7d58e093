use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::user;

use crate::errors::UserError;
use crate::users::domain::{NewUser, User, UserPatch};
use crate::users::repository::UserRepository;

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, UserError> {
        Ok(user::create(&self.db, new).await?)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        Ok(user::find_all(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
        Ok(user::find(&self.db, id).await?)
    }

    async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, UserError> {
        Ok(user::update(&self.db, id, patch).await?)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError> {
        Ok(user::hard_delete(&self.db, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn new_user(email: &str) -> NewUser {
        NewUser { name: "Frank".into(), email: email.into(), profession: "Pilot".into(), status: "Active".into() }
    }

    #[tokio::test]
    async fn seaorm_repository_roundtrip() -> Result<(), anyhow::Error> {
        let repo = SeaOrmUserRepository::new(get_db().await?);

        let u = repo.insert(new_user("frank@example.com")).await?;
        assert_eq!(repo.find_by_id(u.id).await?, Some(u.clone()));
        assert_eq!(repo.find_all().await?.len(), 1);

        let patch = UserPatch { status: Some("Retired".into()), ..UserPatch::default() };
        let updated = repo.update_by_id(u.id, patch).await?.unwrap();
        assert_eq!(updated.status, "Retired");
        assert_eq!(updated.name, "Frank");

        assert!(repo.delete_by_id(u.id).await?);
        assert!(!repo.delete_by_id(u.id).await?);
        assert!(repo.find_by_id(u.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_reports_duplicate_email() -> Result<(), anyhow::Error> {
        let repo = SeaOrmUserRepository::new(get_db().await?);
        repo.insert(new_user("dup@example.com")).await?;

        let err = repo.insert(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateKey(_)), "unexpected error: {err:?}");
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }
}
