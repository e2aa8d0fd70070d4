//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::UserDirectoryPort;
use crate::application::services::GroupMembershipServiceImpl;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::event_bus::BroadcastEventBus;
use crate::infrastructure::persistence::{Persistence, PersistenceFactory};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Group events fan-out, read by WebSocket subscribers
    pub event_bus: BroadcastEventBus,
    /// Writable user directory for the account mirror routes
    pub user_directory: Arc<dyn UserDirectoryPort>,
    // Application services
    pub group_service: GroupMembershipServiceImpl,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let persistence = PersistenceFactory::create(&config.storage).await?;
        Ok(Self::with_persistence(config, persistence))
    }

    /// Wire the services over already-built adapters
    pub fn with_persistence(config: AppConfig, persistence: Persistence) -> Self {
        let event_bus = BroadcastEventBus::new(config.events.channel_capacity);

        let group_service = GroupMembershipServiceImpl::new(
            persistence.users,
            persistence.groups,
            Arc::new(event_bus.clone()),
        );

        Self {
            config,
            event_bus,
            user_directory: persistence.user_directory,
            group_service,
        }
    }
}
