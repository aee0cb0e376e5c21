//! Capstone Teams API
//!
//! Backend for university capstone projects:
//! - Project ownership with one team per student per term
//! - Team invitations with offer / accept / reject / cancel
//! - Notifications on every invitation state change
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
use infrastructure::storage::{Repositories, StorageFactory};
use infrastructure::user::UserService;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = create_repositories(config).await?;
    let policy = config.teams.to_policy()?;

    info!(
        max_members = policy.max_members,
        invitation_ttl_days = policy.invitation_ttl_days,
        "Team policy loaded"
    );

    let jwt_service = create_jwt_service(config);
    let state = AppState::from_repositories(&repositories, policy, jwt_service);

    create_initial_admin_user(&state.user_service).await?;

    Ok(state)
}

/// Connect the configured storage backend
pub async fn create_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    let storage_config = config.storage.to_storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Storage backend selected");

    let repositories = StorageFactory::create(&storage_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    Ok(repositories)
}

/// The configured or environment JWT secret, if any
pub fn configured_jwt_secret(config: &AppConfig) -> Option<String> {
    config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .filter(|secret| !secret.is_empty())
}

/// Create the JWT service from config, `JWT_SECRET`, or a random secret
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let secret = configured_jwt_secret(config).unwrap_or_else(|| {
        warn!(
            "No JWT secret configured. Generating random secret. \
            Tokens will NOT survive a restart. Set JWT_SECRET for persistent tokens."
        );
        generate_random_secret()
    });

    Arc::new(JwtService::new(JwtConfig::new(
        secret,
        config.auth.expiration_hours,
    )))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create an admin from `ADMIN_USER_EMAIL` when the user table is empty
async fn create_initial_admin_user(user_service: &UserService) -> anyhow::Result<()> {
    let email = match std::env::var("ADMIN_USER_EMAIL") {
        Ok(email) if !email.trim().is_empty() => email,
        _ => return Ok(()),
    };
    let name = std::env::var("ADMIN_USER_NAME").unwrap_or_else(|_| "Administrator".to_string());

    if let Some(admin) = user_service.ensure_initial_admin(&name, email.trim()).await? {
        info!(user_id = %admin.id(), email = %admin.email(), "Initial admin user created");
        info!("Issue a token with: capstone-teams token --user {}", admin.id());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_shape() {
        let secret = generate_random_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_random_secret());
    }

    #[test]
    fn test_configured_secret_wins() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("from-config".to_string());
        assert_eq!(configured_jwt_secret(&config).as_deref(), Some("from-config"));
    }

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let state = create_app_state_with_config(&AppConfig::default())
            .await
            .unwrap();

        assert!(state.user_service.count().await.is_ok());
    }
}
