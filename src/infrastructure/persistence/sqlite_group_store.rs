//! SQLite group store
//!
//! Each group is one row: a few indexed columns plus the whole aggregate as a
//! JSON body. The `version` column guards writes.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{GroupStoreError, GroupStorePort};
use crate::domain::aggregates::GroupAggregate;
use crate::domain::value_objects::GroupId;

pub struct SqliteGroupStore {
    pool: SqlitePool,
}

impl SqliteGroupStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                visibility TEXT NOT NULL,
                version INTEGER NOT NULL,
                body TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_groups_owner ON groups(owner_id)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Stored version, 0 when the row is gone
    async fn current_version(&self, id: GroupId) -> Result<u64, GroupStoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT version FROM groups WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(found.unwrap_or(0) as u64)
    }
}

fn db_err(e: sqlx::Error) -> GroupStoreError {
    GroupStoreError::Database(e.to_string())
}

#[async_trait]
impl GroupStorePort for SqliteGroupStore {
    async fn get_by_id(&self, id: GroupId) -> Result<Option<GroupAggregate>, GroupStoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT body FROM groups WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|(body,)| {
            serde_json::from_str(&body).map_err(|e| GroupStoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn save(&self, group: &GroupAggregate) -> Result<(), GroupStoreError> {
        let mut stored = group.clone();
        stored.mark_saved();
        let body = serde_json::to_string(&stored)
            .map_err(|e| GroupStoreError::Serialization(e.to_string()))?;

        // The write carries the version check, so a lost race changes no rows
        let result = if group.version() == 0 {
            sqlx::query(
                r#"
                INSERT INTO groups (id, name, owner_id, visibility, version, body, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
                ON CONFLICT(id) DO NOTHING
            "#,
            )
            .bind(stored.id().to_string())
            .bind(stored.name())
            .bind(stored.owner_id().to_string())
            .bind(stored.visibility().as_str())
            .bind(stored.version() as i64)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(db_err)?
        } else {
            sqlx::query(
                r#"
                UPDATE groups
                SET name = ?, visibility = ?, version = ?, body = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ? AND version = ?
            "#,
            )
            .bind(stored.name())
            .bind(stored.visibility().as_str())
            .bind(stored.version() as i64)
            .bind(body)
            .bind(stored.id().to_string())
            .bind(group.version() as i64)
            .execute(&self.pool)
            .await
            .map_err(db_err)?
        };

        if result.rows_affected() == 0 {
            return Err(GroupStoreError::Conflict {
                group_id: group.id(),
                expected: group.version(),
                found: self.current_version(group.id()).await?,
            });
        }
        Ok(())
    }

    async fn delete(&self, id: GroupId) -> Result<bool, GroupStoreError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
