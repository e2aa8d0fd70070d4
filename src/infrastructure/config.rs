//! Application configuration
//!
//! Layered as built-in defaults, then an optional `mashu.toml`, then
//! `MASHU__*` environment variables (e.g. `MASHU__SERVER__PORT=8080`).

use anyhow::{Context, Result};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub events: EventsConfig,
}

/// HTTP/WebSocket listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Persistence backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// "memory" or "sqlite"
    pub backend: String,
    /// SQLite database file, used when backend is "sqlite"
    pub sqlite_path: String,
}

/// Group event fan-out settings
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Events buffered per subscriber before it starts lagging
    pub channel_capacity: usize,
}

impl AppConfig {
    /// Load configuration from defaults, `mashu.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Some("mashu"))
    }

    /// Load configuration; `file` is a config file stem searched without error if missing
    pub fn load_from(file: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.sqlite_path", "./data/mashu.db")?
            .set_default("events.channel_capacity", 256)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix("MASHU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.storage.backend.as_str() {
            "memory" | "sqlite" => {}
            other => anyhow::bail!(
                "Unknown storage backend '{}': expected 'memory' or 'sqlite'",
                other
            ),
        }
        if self.events.channel_capacity == 0 {
            anyhow::bail!("events.channel_capacity must be greater than zero");
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from(None).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.sqlite_path, "./data/mashu.db");
        assert!(config.events.channel_capacity > 0);
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                backend: "memory".to_string(),
                sqlite_path: String::new(),
            },
            events: EventsConfig {
                channel_capacity: 16,
            },
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let config = AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                backend: "postgres".to_string(),
                sqlite_path: String::new(),
            },
            events: EventsConfig {
                channel_capacity: 16,
            },
        };
        assert!(config.validate().is_err());
    }
}
