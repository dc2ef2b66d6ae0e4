//! Database settings and connection bootstrap shared by the binary and tests.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared connection alias.
pub type DbPool = DatabaseConnection;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://contacts.db?mode=rwc";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error("invalid {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            connect_timeout_secs: 8,
            sqlx_logging: false,
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `DATABASE_SQLX_LOGGING`.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.url = url;
        }
        if let Ok(raw) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections = raw.trim().parse().map_err(|_| DbError::InvalidSetting {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw.clone(),
            })?;
        }
        settings.sqlx_logging = std::env::var("DATABASE_SQLX_LOGGING")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> DbResult<()> {
        if self.url.trim().is_empty() {
            return Err(DbError::MissingUrl);
        }
        if self.max_connections == 0 {
            return Err(DbError::InvalidSetting {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        Ok(())
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sqlx_logging);
        options
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    settings.validate()?;
    let pool = Database::connect(settings.connect_options()).await?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}
