//! Persistence adapters
//!
//! In-memory and SQLite implementations of the group store and user
//! directory ports, plus the factory that selects between them.

mod factory;
mod memory_group_store;
mod memory_user_directory;
mod sqlite_group_store;
mod sqlite_user_directory;

pub use factory::{Persistence, PersistenceFactory};
pub use memory_group_store::InMemoryGroupStore;
pub use memory_user_directory::InMemoryUserDirectory;
pub use sqlite_group_store::SqliteGroupStore;
pub use sqlite_user_directory::SqliteUserDirectory;
