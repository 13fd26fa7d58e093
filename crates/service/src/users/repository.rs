use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User, UserPatch};
use crate::errors::UserError;

/// Repository abstraction for user persistence.
///
/// Implementations classify failures: a uniqueness violation on `email` is
/// `UserError::DuplicateKey`, everything else is `UserError::Store`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User, UserError>;
    async fn find_all(&self) -> Result<Vec<User>, UserError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError>;
    /// Returns the record as it is after the write.
    async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, UserError>;
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError>;
}

/// Simple in-memory repository for tests, doc examples and database-less runs
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<Vec<User>>, // insertion order
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self { Self::default() }

        fn users(&self) -> Result<MutexGuard<'_, Vec<User>>, UserError> {
            self.users.lock().map_err(|_| UserError::Store("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn insert(&self, new: NewUser) -> Result<User, UserError> {
            let mut users = self.users()?;
            if users.iter().any(|u| u.email == new.email) {
                return Err(UserError::DuplicateKey(format!("duplicate key: email {} already exists", new.email)));
            }
            let now = Utc::now().into();
            let user = User {
                id: Uuid::new_v4(),
                name: new.name,
                email: new.email,
                profession: new.profession,
                status: new.status,
                created_at: now,
                updated_at: now,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_all(&self) -> Result<Vec<User>, UserError> {
            Ok(self.users()?.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
            Ok(self.users()?.iter().find(|u| u.id == id).cloned())
        }

        async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, UserError> {
            let mut users = self.users()?;
            let Some(idx) = users.iter().position(|u| u.id == id) else {
                return Ok(None);
            };
            if let Some(email) = &patch.email {
                if users.iter().any(|u| u.id != id && &u.email == email) {
                    return Err(UserError::DuplicateKey(format!("duplicate key: email {email} already exists")));
                }
            }
            let user = &mut users[idx];
            if let Some(name) = patch.name { user.name = name; }
            if let Some(email) = patch.email { user.email = email; }
            if let Some(profession) = patch.profession { user.profession = profession; }
            if let Some(status) = patch.status { user.status = status; }
            user.updated_at = Utc::now().into();
            Ok(Some(user.clone()))
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError> {
            let mut users = self.users()?;
            let before = users.len();
            users.retain(|u| u.id != id);
            Ok(users.len() != before)
        }
    }
}
