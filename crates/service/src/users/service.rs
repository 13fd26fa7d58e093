use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{CreateUserInput, User, UserPatch};
use super::repository::UserRepository;
use crate::errors::UserError;

/// User business service independent of web framework.
///
/// Holds the store handle for the life of the process; calls are independent
/// and carry no state between requests.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self { Self { repo } }

    /// Validate and insert a user, then return the whole collection.
    ///
    /// # Examples
    /// ```
    /// use service::users::{domain::CreateUserInput, repository::mock::InMemoryUserRepository, UserService};
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::new()));
    /// let input = CreateUserInput {
    ///     name: Some("Alice".into()),
    ///     email: Some("a@x.com".into()),
    ///     profession: Some("Engineer".into()),
    ///     status: Some("Active".into()),
    /// };
    /// let users = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(users.len(), 1);
    /// assert_eq!(users[0].email, "a@x.com");
    /// ```
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn create(&self, input: CreateUserInput) -> Result<Vec<User>, UserError> {
        let new = input.validate().map_err(|missing| {
            debug!(?missing, "user_create_rejected");
            UserError::Validation(format!("missing required fields: {}", missing.join(", ")))
        })?;

        let created = self.repo.insert(new).await.map_err(|e| {
            match &e {
                UserError::DuplicateKey(msg) => warn!(error = %msg, "duplicate email"),
                other => error!(error = %other, "user insert failed"),
            }
            e
        })?;
        info!(user_id = %created.id, "user_created");

        self.repo.find_all().await.map_err(|e| {
            error!(error = %e, "reading users after insert failed");
            UserError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let users = self.repo.find_all().await.map_err(|e| {
            error!(error = %e, "list users failed");
            e
        })?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// An identifier that is not a UUID cannot match a stored record.
    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &str) -> Result<User, UserError> {
        let Some(id) = parse_id(id) else {
            return Err(UserError::NotFound);
        };
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!(error = %e, "fetch user failed");
                e
            })?
            .ok_or(UserError::NotFound)
    }

    /// Partial update. `Ok(None)` when no record has `id`; callers do not
    /// treat that as an error.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>, UserError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            debug!(user_id = %id, "empty patch; only updated_at changes");
        }
        let updated = self.repo.update_by_id(id, patch).await.map_err(|e| {
            error!(error = %e, "update user failed");
            e
        })?;
        match &updated {
            Some(u) => info!(user_id = %u.id, "user_updated"),
            None => debug!("update matched no user"),
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), UserError> {
        let Some(id) = parse_id(id) else {
            return Err(UserError::NotFound);
        };
        let removed = self.repo.delete_by_id(id).await.map_err(|e| {
            error!(error = %e, "delete user failed");
            e
        })?;
        if !removed {
            return Err(UserError::NotFound);
        }
        info!(user_id = %id, "user_deleted");
        Ok(())
    }
}

fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::domain::NewUser;
    use crate::users::repository::mock::InMemoryUserRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn input(name: &str, email: &str) -> CreateUserInput {
        CreateUserInput {
            name: Some(name.into()),
            email: Some(email.into()),
            profession: Some("Engineer".into()),
            status: Some("Active".into()),
        }
    }

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserService::new(repo.clone()), repo)
    }

    /// Every call fails as if the database were down.
    struct BrokenRepo;

    #[async_trait]
    impl UserRepository for BrokenRepo {
        async fn insert(&self, _new: NewUser) -> Result<User, UserError> { Err(UserError::Store("Database down".into())) }
        async fn find_all(&self) -> Result<Vec<User>, UserError> { Err(UserError::Store("Database down".into())) }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, UserError> { Err(UserError::Store("Database down".into())) }
        async fn update_by_id(&self, _id: Uuid, _patch: UserPatch) -> Result<Option<User>, UserError> { Err(UserError::Store("Database down".into())) }
        async fn delete_by_id(&self, _id: Uuid) -> Result<bool, UserError> { Err(UserError::Store("Database down".into())) }
    }

    /// Counts inserts and full reads on top of the in-memory store.
    #[derive(Default)]
    struct CountingRepo {
        inner: InMemoryUserRepository,
        inserts: AtomicUsize,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for CountingRepo {
        async fn insert(&self, new: NewUser) -> Result<User, UserError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(new).await
        }
        async fn find_all(&self) -> Result<Vec<User>, UserError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all().await
        }
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> { self.inner.find_by_id(id).await }
        async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, UserError> { self.inner.update_by_id(id, patch).await }
        async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError> { self.inner.delete_by_id(id).await }
    }

    #[tokio::test]
    async fn create_returns_whole_collection() {
        let (svc, _) = service();
        svc.create(input("Bob", "bob@example.com")).await.unwrap();
        let users = svc.create(input("Alice", "a@x.com")).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.name == "Alice" && u.email == "a@x.com"));
    }

    #[tokio::test]
    async fn create_inserts_once_then_reads_once() {
        let repo = Arc::new(CountingRepo::default());
        let svc = UserService::new(repo.clone());
        svc.create(input("Alice", "a@x.com")).await.unwrap();
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);

        let _ = svc.create(input("Alice", "a@x.com")).await.unwrap_err();
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 2);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_missing_any_field_persists_nothing() {
        let (svc, repo) = service();
        let strip: [fn(&mut CreateUserInput); 4] = [
            |i| i.name = None,
            |i| i.email = None,
            |i| i.profession = Some(String::new()),
            |i| i.status = None,
        ];
        for f in strip {
            let mut i = input("Carol", "carol@example.com");
            f(&mut i);
            let err = svc.create(i).await.unwrap_err();
            assert!(matches!(err, UserError::Validation(_)));
        }
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_keeps_collection() {
        let (svc, repo) = service();
        svc.create(input("Dan", "dan@example.com")).await.unwrap();
        let err = svc.create(input("Daniel", "dan@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateKey(_)));
        let users = repo.find_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Dan");
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let svc = UserService::new(Arc::new(BrokenRepo));
        let id = Uuid::new_v4().to_string();
        assert_eq!(svc.create(input("Eve", "eve@example.com")).await.unwrap_err(), UserError::Store("Database down".into()));
        assert_eq!(svc.list_all().await.unwrap_err(), UserError::Store("Database down".into()));
        assert_eq!(svc.get_one(&id).await.unwrap_err(), UserError::Store("Database down".into()));
        assert_eq!(svc.update(&id, UserPatch::default()).await.unwrap_err(), UserError::Store("Database down".into()));
        assert_eq!(svc.delete(&id).await.unwrap_err(), UserError::Store("Database down".into()));
    }

    #[tokio::test]
    async fn get_one_found_and_missing() {
        let (svc, _) = service();
        let users = svc.create(input("Gina", "gina@example.com")).await.unwrap();
        let id = users[0].id.to_string();
        assert_eq!(svc.get_one(&id).await.unwrap(), users[0]);
        assert_eq!(svc.get_one(&Uuid::new_v4().to_string()).await.unwrap_err(), UserError::NotFound);
        assert_eq!(svc.get_one("not-a-uuid").await.unwrap_err(), UserError::NotFound);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let (svc, _) = service();
        let before = svc.create(input("Hank", "hank@example.com")).await.unwrap().remove(0);
        let patch = UserPatch { name: Some("X".into()), ..UserPatch::default() };
        let after = svc.update(&before.id.to_string(), patch).await.unwrap().unwrap();
        assert_eq!(after.name, "X");
        assert_eq!(after.email, before.email);
        assert_eq!(after.profession, before.profession);
        assert_eq!(after.status, before.status);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_an_error() {
        let (svc, _) = service();
        let patch = UserPatch { name: Some("Nobody".into()), ..UserPatch::default() };
        assert_eq!(svc.update(&Uuid::new_v4().to_string(), patch.clone()).await.unwrap(), None);
        assert_eq!(svc.update("garbage", patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_unknown_id_with_taken_email_is_not_an_error() {
        let (svc, repo) = service();
        svc.create(input("Alice", "a@x.com")).await.unwrap();
        let patch = UserPatch { email: Some("a@x.com".into()), ..UserPatch::default() };
        assert_eq!(svc.update(&Uuid::new_v4().to_string(), patch).await.unwrap(), None);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_into_taken_email_is_duplicate() {
        let (svc, _) = service();
        svc.create(input("Alice", "a@x.com")).await.unwrap();
        let bob = svc.create(input("Bob", "bob@example.com")).await.unwrap().remove(1);
        let patch = UserPatch { email: Some("a@x.com".into()), ..UserPatch::default() };
        let err = svc.update(&bob.id.to_string(), patch).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (svc, repo) = service();
        let users = svc.create(input("Ivy", "ivy@example.com")).await.unwrap();
        let id = users[0].id.to_string();
        svc.delete(&id).await.unwrap();
        assert_eq!(svc.get_one(&id).await.unwrap_err(), UserError::NotFound);
        assert_eq!(svc.delete(&id).await.unwrap_err(), UserError::NotFound);
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_collection() {
        let (svc, repo) = service();
        svc.create(input("Jack", "jack@example.com")).await.unwrap();
        assert_eq!(svc.delete(&Uuid::new_v4().to_string()).await.unwrap_err(), UserError::NotFound);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
