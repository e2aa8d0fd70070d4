//! SQLite user directory

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{UserDirectoryPort, UserLookupError, UserLookupPort};
use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                is_public INTEGER NOT NULL DEFAULT 1
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UserLookupPort for SqliteUserDirectory {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, UserLookupError> {
        let row: Option<(String, bool)> =
            sqlx::query_as("SELECT username, is_public FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| UserLookupError::Database(e.to_string()))?;

        Ok(row.map(|(username, is_public)| User::new(id, username, is_public)))
    }
}

#[async_trait]
impl UserDirectoryPort for SqliteUserDirectory {
    async fn upsert(&self, user: &User) -> Result<(), UserLookupError> {
        sqlx::query("INSERT OR REPLACE INTO users (id, username, is_public) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(user.is_public)
            .execute(&self.pool)
            .await
            .map_err(|e| UserLookupError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_upsert_and_lookup() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let directory = SqliteUserDirectory::new(pool).await.unwrap();
        let id = UserId::new();

        assert!(directory.get_by_id(id).await.unwrap().is_none());

        directory.upsert(&User::new(id, "bob", false)).await.unwrap();
        let user = directory.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user, User::new(id, "bob", false));

        directory.upsert(&User::new(id, "robert", true)).await.unwrap();
        let user = directory.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.username, "robert");
        assert!(user.is_public);
    }
}
