use crate::data_processing::ItemId;
use crate::validator::BattleTypeMismatch;
use serde::Serialize;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Change notifications for the presentation layer and sync collaborators.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    RatingsUpdated { item_ids: Vec<ItemId>, implied: bool },
    MilestoneReached { threshold: u64, crossed_count: usize },
    MilestoneCleared,
    RefinementQueueChanged { len: usize },
    BattleTypeMismatch(BattleTypeMismatch),
    SessionReset,
}

/// Fan-out channel owned by the session. Subscribers that hung up are dropped on publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SessionEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn num_subscribers(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives_events() {
        let mut bus = EventBus::default();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(SessionEvent::SessionReset);
        assert_eq!(a.try_recv().ok(), Some(SessionEvent::SessionReset));
        assert_eq!(b.try_recv().ok(), Some(SessionEvent::SessionReset));
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut bus = EventBus::default();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        bus.publish(SessionEvent::MilestoneCleared);
        assert_eq!(bus.num_subscribers(), 1);
        assert_eq!(kept.try_recv().ok(), Some(SessionEvent::MilestoneCleared));
    }
}
