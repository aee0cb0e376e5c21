//! User service for account management

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{User, UserId, UserRepository, UserRole};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
}

/// User service for account management
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        info!(email = %request.email, role = request.role.as_str(), "Creating user");

        let mut user = User::new(UserId::generate(), request.name, request.email, request.role)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(username) = request.github_username {
            user = user
                .with_github_username(username)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(url) = request.avatar_url {
            user = user.with_avatar_url(url);
        }

        if self.repository.get_by_email(user.email()).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        self.repository.create(user).await
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user that must exist
    pub async fn require(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Number of registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Create an administrator when no users exist yet
    ///
    /// Returns the created admin, or `None` when users are already present.
    pub async fn ensure_initial_admin(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Option<User>, DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(None);
        }

        warn!(email = %email, "No users found, creating initial administrator");

        let admin = self
            .create(CreateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
                role: UserRole::Admin,
                github_username: None,
                avatar_url: None,
            })
            .await?;

        Ok(Some(admin))
    }
}
