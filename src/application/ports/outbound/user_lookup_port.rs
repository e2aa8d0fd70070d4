//! User lookup port - read-only access to user records

use async_trait::async_trait;

use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

#[derive(Debug, thiserror::Error)]
pub enum UserLookupError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Resolves user identifiers to user records.
///
/// A missing user is `Ok(None)`; `Err` is reserved for lookup failures.
#[async_trait]
pub trait UserLookupPort: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, UserLookupError>;
}

/// Writable user directory, fed by the account subsystem
#[async_trait]
pub trait UserDirectoryPort: UserLookupPort {
    /// Insert or replace a user record
    async fn upsert(&self, user: &User) -> Result<(), UserLookupError>;
}
