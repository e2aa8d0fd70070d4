//! Persistence factory - Creates store adapters based on configuration
//!
//! Supports the `memory` backend (state lost on restart) and the `sqlite`
//! backend (one database file holding the groups and users tables).

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::application::ports::outbound::{GroupStorePort, UserDirectoryPort, UserLookupPort};
use crate::infrastructure::config::StorageConfig;
use crate::infrastructure::persistence::{
    InMemoryGroupStore, InMemoryUserDirectory, SqliteGroupStore, SqliteUserDirectory,
};

/// The adapters a running engine needs, already type-erased
#[derive(Clone)]
pub struct Persistence {
    pub groups: Arc<dyn GroupStorePort>,
    pub users: Arc<dyn UserLookupPort>,
    pub user_directory: Arc<dyn UserDirectoryPort>,
}

pub struct PersistenceFactory;

impl PersistenceFactory {
    /// Build the adapters for the configured backend
    pub async fn create(config: &StorageConfig) -> Result<Persistence> {
        match config.backend.as_str() {
            "memory" => {
                tracing::info!("Using in-memory persistence");
                Ok(Self::memory())
            }
            "sqlite" => Self::sqlite(&config.sqlite_path).await,
            backend => anyhow::bail!("Unsupported storage backend: {}", backend),
        }
    }

    pub fn memory() -> Persistence {
        let users = Arc::new(InMemoryUserDirectory::new());
        Persistence {
            groups: Arc::new(InMemoryGroupStore::new()),
            users: users.clone(),
            user_directory: users,
        }
    }

    async fn sqlite(path: &str) -> Result<Persistence> {
        // Ensure data directory exists
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;
        tracing::info!("Connected to SQLite database: {}", path);

        let groups = SqliteGroupStore::new(pool.clone())
            .await
            .context("Failed to initialize groups table")?;
        let users = Arc::new(
            SqliteUserDirectory::new(pool)
                .await
                .context("Failed to initialize users table")?,
        );

        Ok(Persistence {
            groups: Arc::new(groups),
            users: users.clone(),
            user_directory: users,
        })
    }
}
