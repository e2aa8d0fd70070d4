//! Group store port - whole-aggregate persistence for groups

use async_trait::async_trait;

use crate::domain::aggregates::GroupAggregate;
use crate::domain::value_objects::GroupId;

#[derive(Debug, thiserror::Error)]
pub enum GroupStoreError {
    /// The stored aggregate changed since it was loaded
    #[error("Group {group_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        group_id: GroupId,
        expected: u64,
        found: u64,
    },
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Loads and stores group aggregates as single units.
///
/// `save` is a compare-and-swap on the aggregate version: it succeeds only
/// when the stored version equals `group.version()` (or nothing is stored
/// yet), and the stored version becomes `group.version() + 1`.
#[async_trait]
pub trait GroupStorePort: Send + Sync {
    /// Get a group by ID
    async fn get_by_id(&self, id: GroupId) -> Result<Option<GroupAggregate>, GroupStoreError>;

    /// Replace the whole aggregate
    async fn save(&self, group: &GroupAggregate) -> Result<(), GroupStoreError>;

    /// Delete a group. Returns false if it did not exist.
    async fn delete(&self, id: GroupId) -> Result<bool, GroupStoreError>;
}
