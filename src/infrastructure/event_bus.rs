//! In-process group event bus using a tokio broadcast channel
//!
//! Every subscriber sees every event published after it subscribed. Events
//! are dropped when nobody is listening. Subscribers that fall more than the
//! channel capacity behind lose the oldest events.

use tokio::sync::broadcast;

use crate::application::ports::outbound::GroupEventPublisherPort;
use crate::domain::events::GroupEvent;

#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<GroupEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GroupEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl GroupEventPublisherPort for BroadcastEventBus {
    fn publish(&self, event: GroupEvent) {
        // No receivers is fine
        if let Ok(receivers) = self.sender.send(event) {
            tracing::trace!(receivers, "Group event broadcast");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::GroupEventKind;
    use crate::domain::value_objects::{GroupId, UserId};

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = BroadcastEventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let group_id = GroupId::new();
        let user_id = UserId::new();

        bus.publish(GroupEvent::new(group_id, GroupEventKind::MemberLeft { user_id }));

        assert_eq!(first.recv().await.unwrap().group_id, group_id);
        assert_eq!(second.recv().await.unwrap().group_id, group_id);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = BroadcastEventBus::new(8);
        bus.publish(GroupEvent::new(
            GroupId::new(),
            GroupEventKind::MemberLeft {
                user_id: UserId::new(),
            },
        ));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let bus = BroadcastEventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..4 {
            bus.publish(GroupEvent::new(
                GroupId::new(),
                GroupEventKind::MemberLeft {
                    user_id: UserId::new(),
                },
            ));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
        assert!(rx.recv().await.is_ok());
    }
}
