use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use holdem_engine::events::TableEvent;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::session::SessionKey;

// Bounded per subscriber; a subscriber that falls this far behind is dropped.
const EVENT_CHANNEL_BUFFER: usize = 256;

/// A table event tagged with the session it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    pub session: SessionKey,
    #[serde(flatten)]
    pub event: TableEvent,
}

pub type EventSender = mpsc::Sender<SessionEvent>;
pub type EventReceiver = mpsc::Receiver<SessionEvent>;

/// Receiving end of a subscription. Unsubscribes on drop.
pub struct EventSubscription {
    bus: EventBus,
    session: SessionKey,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session, self.subscriber_id);
    }
}

/// Fan-out of table events to per-session subscribers (chat front ends, renderers).
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

type SubscriberMap = HashMap<SessionKey, Vec<(usize, EventSender)>>;

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<SubscriberMap>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session: SessionKey) -> EventSubscription {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session)
            .or_default()
            .push((id, tx));
        tracing::debug!(session = %session, subscriber_id = id, "subscribed to table events");
        EventSubscription {
            bus: self.clone(),
            session,
            subscriber_id: id,
            receiver: rx,
        }
    }

    /// Delivers without blocking. Subscribers that are gone or full are pruned.
    pub fn publish(&self, session: &SessionKey, event: TableEvent) {
        let list = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .cloned();
        let Some(list) = list else {
            tracing::trace!(session = %session, "no subscribers for session");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            let msg = SessionEvent {
                session: *session,
                event: event.clone(),
            };
            if let Err(err) = sender.try_send(msg) {
                tracing::warn!(
                    session = %session,
                    subscriber_id = id,
                    error = %err,
                    "dropping subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(session, &failed);
        }
    }

    pub fn unsubscribe(&self, session: &SessionKey, subscriber_id: usize) {
        self.remove_subscribers(session, &[subscriber_id]);
    }

    /// Forgets every subscriber of a session, closing their channels.
    pub fn drop_session(&self, session: &SessionKey) {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    fn remove_subscribers(&self, session: &SessionKey, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(session) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session);
            }
        }
    }
}
