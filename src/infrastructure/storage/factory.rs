//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::invitation::TeamInvitationRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::project::{ProjectMemberRepository, ProjectRepository};
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::invitation::{
    InMemoryTeamInvitationRepository, PostgresTeamInvitationRepository,
};
use crate::infrastructure::notification::{
    InMemoryNotificationRepository, PostgresNotificationRepository,
};
use crate::infrastructure::project::{
    InMemoryProjectMemberRepository, InMemoryProjectRepository, PostgresProjectMemberRepository,
    PostgresProjectRepository,
};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::in_memory::InMemoryDatabase;
use super::migrations::run_storage_migrations;
use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the services need, backed by one datastore
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub members: Arc<dyn ProjectMemberRepository>,
    pub invitations: Arc<dyn TeamInvitationRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("users", &self.users)
            .field("projects", &self.projects)
            .field("members", &self.members)
            .field("invitations", &self.invitations)
            .finish_non_exhaustive()
    }
}

/// Factory for creating repository bundles
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories for the configured backend
    ///
    /// PostgreSQL schemas are migrated before the repositories are returned.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!(
                    max_connections = pg_config.max_connections,
                    "Using PostgreSQL storage"
                );
                let pool = pg_config.connect().await?;
                run_storage_migrations(&pool).await?;
                Ok(Self::postgres(pool))
            }
        }
    }

    /// Creates repositories sharing one fresh in-memory database
    pub fn in_memory() -> Repositories {
        let db = Arc::new(InMemoryDatabase::new());

        Repositories {
            users: Arc::new(InMemoryUserRepository::new(db.clone())),
            projects: Arc::new(InMemoryProjectRepository::new(db.clone())),
            members: Arc::new(InMemoryProjectMemberRepository::new(db.clone())),
            invitations: Arc::new(InMemoryTeamInvitationRepository::new(db.clone())),
            notifications: Arc::new(InMemoryNotificationRepository::new(db)),
        }
    }

    /// Creates repositories sharing one PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Repositories {
        Repositories {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            projects: Arc::new(PostgresProjectRepository::new(pool.clone())),
            members: Arc::new(PostgresProjectMemberRepository::new(pool.clone())),
            invitations: Arc::new(PostgresTeamInvitationRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(
            StorageType::from_str("in-memory"),
            Some(StorageType::InMemory)
        );
        assert_eq!(
            StorageType::from_str("postgres"),
            Some(StorageType::Postgres)
        );
        assert_eq!(
            StorageType::from_str("PostgreSQL"),
            Some(StorageType::Postgres)
        );
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        let in_memory = StorageConfig::in_memory();
        assert_eq!(in_memory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres_url("postgres://localhost/test");
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_in_memory_repositories_share_one_database() {
        use crate::domain::user::{User, UserId, UserRole};

        let repos = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();
        let user = User::new(
            UserId::generate(),
            "Sari",
            "sari@example.ac.id",
            UserRole::Student,
        )
        .unwrap();

        repos.users.create(user).await.unwrap();

        assert_eq!(repos.users.count().await.unwrap(), 1);
    }
}
