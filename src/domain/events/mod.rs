//! Domain events - Notifications of significant state changes

mod group_events;

pub use group_events::{GroupEvent, GroupEventKind};
