//! Database connection configuration.
//!
//! Everything is driven by one connection string. The default points at a
//! local SQLite file (created on first open); pointing `DATABASE_URL` at a
//! PostgreSQL server switches the backend without code changes.

use serde::Deserialize;
use thiserror::Error;

/// Connection string used when `DATABASE_URL` is not set.
///
/// `mode=rwc` lets SQLite create the file if it does not exist yet.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://agentctl.db?mode=rwc";

/// Default maximum pooled connections. Kept low for single-node use.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors produced while resolving database configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The URL scheme does not name a supported backend.
    #[error("unsupported database URL scheme in '{url}' (expected sqlite:// or postgres://)")]
    UnsupportedScheme { url: String },
}

/// The storage family behind the connection string.
///
/// Callers that need backend-specific behavior (concurrency expectations,
/// dialect differences in DDL) branch on this instead of re-parsing URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Local file-backed store (serialized writers).
    Sqlite,
    /// Client/server store (row-level locking).
    Postgres,
}

impl BackendKind {
    /// Detect the backend family from a connection URL.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let scheme = url.split("://").next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(ConfigError::UnsupportedScheme {
                url: url.to_owned(),
            }),
        }
    }

    pub fn is_sqlite(self) -> bool {
        self == Self::Sqlite
    }

    pub fn is_postgres(self) -> bool {
        self == Self::Postgres
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database settings resolved from the environment or a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string selecting backend and location.
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_owned()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Resolve from `DATABASE_URL`, falling back to the local SQLite file.
    pub fn from_env() -> Self {
        let url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        Self::new(url)
    }

    /// Which storage family the configured URL selects.
    pub fn backend(&self) -> Result<BackendKind, ConfigError> {
        BackendKind::from_url(&self.url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sqlite() {
        let kind = BackendKind::from_url("sqlite://agentctl.db?mode=rwc").unwrap();
        assert!(kind.is_sqlite());
        assert!(!kind.is_postgres());
    }

    #[test]
    fn detects_postgres() {
        for url in [
            "postgres://user:pw@localhost/agentctl",
            "postgresql://localhost/agentctl",
        ] {
            let kind = BackendKind::from_url(url).unwrap();
            assert!(kind.is_postgres());
            assert!(!kind.is_sqlite());
        }
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = BackendKind::from_url("mysql://localhost/agentctl").unwrap_err();
        assert!(err.to_string().contains("mysql://localhost/agentctl"));
    }

    #[test]
    fn default_is_file_backed() {
        let config = DatabaseConfig::default();
        assert!(config.backend().unwrap().is_sqlite());
        assert_eq!(config.max_connections, 5);
    }
}
