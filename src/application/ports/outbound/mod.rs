//! Outbound ports - Interfaces that the application requires from external systems

mod event_publisher_port;
mod group_store_port;
mod user_lookup_port;

pub use event_publisher_port::GroupEventPublisherPort;
pub use group_store_port::{GroupStoreError, GroupStorePort};
pub use user_lookup_port::{UserDirectoryPort, UserLookupError, UserLookupPort};
