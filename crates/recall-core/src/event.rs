//! Cross-component conversation events.
//!
//! Deletions are announced on an injected bus so that other surfaces showing
//! the same conversations (e.g. the overlay window) can evict them without
//! holding a reference to the history manager.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Event name used when the event is forwarded to a UI layer.
pub const CONVERSATION_DELETED: &str = "conversationDeleted";

/// Events published by the history manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A conversation was removed from the store.
    Deleted { id: String },
}

impl ConversationEvent {
    pub fn deleted(id: impl Into<String>) -> Self {
        Self::Deleted { id: id.into() }
    }

    /// Name of the event as seen by UI listeners.
    pub fn name(&self) -> &'static str {
        match self {
            ConversationEvent::Deleted { .. } => CONVERSATION_DELETED,
        }
    }

    /// The conversation the event refers to.
    pub fn conversation_id(&self) -> &str {
        match self {
            ConversationEvent::Deleted { id } => id,
        }
    }
}

/// Receiving end handed out by [`ConversationEventBus::subscribe`].
pub type ConversationEventReceiver = mpsc::UnboundedReceiver<ConversationEvent>;

type Subscribers = Vec<mpsc::UnboundedSender<ConversationEvent>>;

/// Fire-and-forget publish/subscribe bus for [`ConversationEvent`]s.
///
/// Each subscriber owns an unbounded queue, so a burst of deletions (a large
/// batch) is delivered in full and in publish order even when nobody reads
/// until the burst is over. Cloning the bus yields another handle to the
/// same subscriber list. Dropped receivers are pruned on the next publish.
#[derive(Debug, Clone, Default)]
pub struct ConversationEventBus {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl ConversationEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publishes an event to every current subscriber.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, event: ConversationEvent) {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());

        if subscribers.is_empty() {
            tracing::debug!(
                event = event.name(),
                conversation_id = event.conversation_id(),
                "No subscribers for conversation event"
            );
        } else {
            tracing::debug!(receivers = subscribers.len(), "Published conversation event");
        }
    }

    pub fn subscribe(&self) -> ConversationEventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers().push(tx);
        rx
    }

    /// Number of subscribers whose receiver is still alive.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = ConversationEventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.clone().subscribe();

        bus.publish(ConversationEvent::deleted("c-1"));

        assert_eq!(a.recv().await.unwrap(), ConversationEvent::deleted("c-1"));
        assert_eq!(b.recv().await.unwrap().conversation_id(), "c-1");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = ConversationEventBus::new();
        bus.publish(ConversationEvent::deleted("nobody-listens"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_burst_is_delivered_in_full_and_in_order() {
        let bus = ConversationEventBus::new();
        let mut rx = bus.subscribe();

        for i in 0..500 {
            bus.publish(ConversationEvent::deleted(format!("c-{}", i)));
        }

        for i in 0..500 {
            let event = rx.try_recv().unwrap();
            assert_eq!(event.conversation_id(), format!("c-{}", i));
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = ConversationEventBus::new();
        let rx = bus.subscribe();
        let _kept = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx);
        bus.publish(ConversationEvent::deleted("x"));

        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_independent_buses_do_not_share_events() {
        let first = ConversationEventBus::new();
        let second = ConversationEventBus::new();
        let mut rx = second.subscribe();

        first.publish(ConversationEvent::deleted("x"));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_name() {
        assert_eq!(ConversationEvent::deleted("x").name(), "conversationDeleted");
    }
}
