//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: User, membership entries
//! - Value Objects: identifiers, group visibility, request actions
//! - Aggregates: Group aggregate root
//! - Domain Events: membership changes
//! - Domain Services: the group permission policy

pub mod aggregates;
pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
