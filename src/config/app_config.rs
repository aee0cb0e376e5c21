use serde::Deserialize;

use crate::infrastructure::invitation::{
    TeamPolicyConfig, DEFAULT_INVITATION_TTL_DAYS, DEFAULT_MAX_TEAM_MEMBERS,
};
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub auth: AuthConfig,
    pub teams: TeamsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Datastore selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    /// Falls back to the `DATABASE_URL` environment variable
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret; a random one is generated when unset
    pub jwt_secret: Option<String>,
    pub expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    /// Cap on members plus pending invitations per project, owner excluded
    pub max_members: usize,
    pub invitation_ttl_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            expiration_hours: 24,
        }
    }
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_TEAM_MEMBERS,
            invitation_ttl_days: DEFAULT_INVITATION_TTL_DAYS,
        }
    }
}

impl StorageSettings {
    /// Resolve the backend selection into a storage configuration
    pub fn to_storage_config(&self) -> Result<StorageConfig, config::ConfigError> {
        let backend = StorageType::from_str(&self.backend).ok_or_else(|| {
            config::ConfigError::Message(format!("Unknown storage backend '{}'", self.backend))
        })?;

        match backend {
            StorageType::InMemory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let url = self
                    .database_url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .ok_or_else(|| {
                        config::ConfigError::Message(
                            "storage.database_url or DATABASE_URL is required for postgres"
                                .to_string(),
                        )
                    })?;

                Ok(StorageConfig::postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(self.max_connections)
                        .with_min_connections(self.min_connections),
                ))
            }
        }
    }
}

impl TeamsConfig {
    pub fn to_policy(&self) -> Result<TeamPolicyConfig, config::ConfigError> {
        if self.max_members == 0 {
            return Err(config::ConfigError::Message(
                "teams.max_members must be at least 1".to_string(),
            ));
        }

        if self.invitation_ttl_days <= 0 {
            return Err(config::ConfigError::Message(
                "teams.invitation_ttl_days must be positive".to_string(),
            ));
        }

        Ok(TeamPolicyConfig {
            max_members: self.max_members,
            invitation_ttl_days: self.invitation_ttl_days,
        })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.teams.max_members, 3);
        assert_eq!(config.teams.invitation_ttl_days, 7);
        assert_eq!(config.auth.expiration_hours, 24);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("teams.max_members", 5)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.teams.max_members, 5);
        assert_eq!(config.teams.invitation_ttl_days, 7);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_storage_selection() {
        let memory = StorageSettings::default().to_storage_config().unwrap();
        assert_eq!(memory.storage_type(), StorageType::InMemory);

        let postgres = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/capstone".to_string()),
            ..Default::default()
        }
        .to_storage_config()
        .unwrap();
        assert_eq!(postgres.storage_type(), StorageType::Postgres);

        let unknown = StorageSettings {
            backend: "mongo".to_string(),
            ..Default::default()
        };
        assert!(unknown.to_storage_config().is_err());
    }

    #[test]
    fn test_team_policy_validation() {
        assert_eq!(
            TeamsConfig::default().to_policy().unwrap(),
            TeamPolicyConfig::default()
        );

        let invalid = TeamsConfig {
            max_members: 0,
            invitation_ttl_days: 7,
        };
        assert!(invalid.to_policy().is_err());
    }
}
