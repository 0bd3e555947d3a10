//! Change notifications for board subscribers.
//!
//! Write operations on the service publish a [`ChangeEvent`] after they
//! succeed. Realtime surfaces subscribe through [`EventBus::subscribe`] and
//! decide for themselves how to push the refresh to clients.

use crate::models::{Role, TaskId, Weekday};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 100;

/// Something that subscribers may need to refresh for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// The assignment set for (role, weekday) was replaced
    BoardChanged { role: Role, weekday: Weekday },
    /// The substitute for (main_role, date) was set or cleared
    SubstitutesChanged { main_role: Role, date: NaiveDate },
    /// A completion for (task, date) was recorded or canceled
    CompletionChanged { task_id: TaskId, date: NaiveDate },
}

/// Fan-out channel for change events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "published change event"),
            Err(broadcast::error::SendError(event)) => {
                debug!(?event, "no subscribers for change event")
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = ChangeEvent::BoardChanged {
            role: Role::KeeperI,
            weekday: Weekday::new(2).unwrap(),
        };
        bus.publish(event.clone());

        assert_eq!(rx1.try_recv().unwrap(), event);
        assert_eq!(rx2.try_recv().unwrap(), event);
        assert!(matches!(rx1.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(ChangeEvent::CompletionChanged {
            task_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let event = ChangeEvent::SubstitutesChanged {
            main_role: Role::Veterinarian,
            date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "substitutes_changed");
        assert_eq!(json["main_role"], "Veterinārārsts");
        assert_eq!(json["date"], "2024-03-06");
    }
}
