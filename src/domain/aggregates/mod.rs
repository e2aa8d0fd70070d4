//! Aggregates - Cluster of domain objects treated as a single unit

pub mod group_aggregate;

pub use group_aggregate::{AggregateError, GroupAggregate};
