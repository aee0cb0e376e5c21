//! In-memory user repository implementation

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryDatabase::new()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.db.read().await.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .users
            .values()
            .find(|u| u.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.db.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        if tables.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if tables
            .users
            .values()
            .any(|u| u.email().eq_ignore_ascii_case(user.email()))
        {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        tables.users.insert(*user.id(), user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.db.read().await.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    fn student(email: &str) -> User {
        User::new(UserId::generate(), "Rina", email, UserRole::Student).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::default();
        let user = student("rina@example.ac.id");
        let id = *user.id();

        repo.create(user).await.unwrap();

        let found = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(found.email(), "rina@example.ac.id");
        assert!(repo.exists(&id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::default();
        repo.create(student("rina@example.ac.id")).await.unwrap();

        let err = repo
            .create(student("RINA@example.ac.id"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_by_email_and_many() {
        let repo = InMemoryUserRepository::default();
        let a = repo.create(student("a@example.ac.id")).await.unwrap();
        let b = repo.create(student("b@example.ac.id")).await.unwrap();

        let found = repo.get_by_email("b@example.ac.id").await.unwrap().unwrap();
        assert_eq!(found.id(), b.id());

        let many = repo
            .get_many(&[*a.id(), UserId::generate(), *b.id()])
            .await
            .unwrap();
        assert_eq!(many.len(), 2);
    }
}
