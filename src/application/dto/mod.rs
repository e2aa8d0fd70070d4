//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP/WebSocket) can
//! serialize/deserialize without leaking wire shapes into the domain model.

pub mod group;

pub use group::*;
