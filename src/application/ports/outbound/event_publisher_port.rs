//! Event publisher port - fan-out of group events to interested adapters

use crate::domain::events::GroupEvent;

/// Publishes group events. Delivery is best effort and never fails the caller.
pub trait GroupEventPublisherPort: Send + Sync {
    fn publish(&self, event: GroupEvent);
}
