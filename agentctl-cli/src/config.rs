//! CLI configuration: optional `agentctl.toml` plus environment overrides.
//!
//! Resolution order, later wins:
//!   1. built-in defaults
//!   2. `agentctl.toml` in the working directory (or `--config` path)
//!   3. `DATABASE_URL` from the environment / `.env`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use agentctl_core::DatabaseConfig;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "agentctl.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerSection,

    /// The `[database]` section maps straight onto the persistence
    /// layer's own settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins).
    #[serde(default)]
    pub cors_permissive: bool,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: false,
        }
    }
}

impl CliConfig {
    /// Load configuration. A missing default file is fine; a missing
    /// explicit `--config` path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid TOML in {}", path.display()))?
        } else if required {
            anyhow::bail!("config file not found: {}", path.display());
        } else {
            Self::default()
        };

        // Environment wins over the file.
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_sqlite() {
        let config = CliConfig::default();
        assert!(config.database.backend().unwrap().is_sqlite());
        assert_eq!(config.server.bind.port(), 8000);
    }

    #[test]
    fn parses_toml_sections() {
        let config: CliConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [database]
            url = "postgres://localhost/agentctl"
            max_connections = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.database.max_connections, 12);
        assert!(config.database.backend().unwrap().is_postgres());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert!(config.database.backend().unwrap().is_sqlite());
    }
}
