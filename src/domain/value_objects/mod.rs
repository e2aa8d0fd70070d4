//! Value objects - Immutable objects defined by their attributes

mod group_visibility;
mod ids;
mod request_action;

pub use group_visibility::GroupVisibility;
pub use ids::*;
pub use request_action::RequestAction;
