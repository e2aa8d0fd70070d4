//! In-memory user directory

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{UserDirectoryPort, UserLookupError, UserLookupPort};
use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserLookupPort for InMemoryUserDirectory {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, UserLookupError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl UserDirectoryPort for InMemoryUserDirectory {
    async fn upsert(&self, user: &User) -> Result<(), UserLookupError> {
        self.insert(user.clone()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_record() {
        let directory = InMemoryUserDirectory::new();
        let id = UserId::new();

        directory.upsert(&User::new(id, "alice", true)).await.unwrap();
        directory.upsert(&User::new(id, "alice2", false)).await.unwrap();

        let user = directory.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.username, "alice2");
        assert!(!user.is_public);
        assert!(directory.get_by_id(UserId::new()).await.unwrap().is_none());
    }
}
