//! In-memory group store
//!
//! Keeps whole aggregates in a map. Used for the `memory` backend and as the
//! store behind service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{GroupStoreError, GroupStorePort};
use crate::domain::aggregates::GroupAggregate;
use crate::domain::value_objects::GroupId;

#[derive(Default)]
pub struct InMemoryGroupStore {
    groups: RwLock<HashMap<GroupId, GroupAggregate>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.groups.read().await.len()
    }
}

#[async_trait]
impl GroupStorePort for InMemoryGroupStore {
    async fn get_by_id(&self, id: GroupId) -> Result<Option<GroupAggregate>, GroupStoreError> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn save(&self, group: &GroupAggregate) -> Result<(), GroupStoreError> {
        let mut groups = self.groups.write().await;

        let found = groups.get(&group.id()).map(|g| g.version()).unwrap_or(0);
        if found != group.version() {
            return Err(GroupStoreError::Conflict {
                group_id: group.id(),
                expected: group.version(),
                found,
            });
        }

        let mut stored = group.clone();
        stored.mark_saved();
        groups.insert(stored.id(), stored);
        Ok(())
    }

    async fn delete(&self, id: GroupId) -> Result<bool, GroupStoreError> {
        Ok(self.groups.write().await.remove(&id).is_some())
    }
}
