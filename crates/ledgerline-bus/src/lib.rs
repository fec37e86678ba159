//! Session-lifecycle event bus for Ledgerline.
//!
//! Independently-mounted components (the inactivity shell, the
//! navigation surface with its manual logout control, the unload guard)
//! have no shared parent, so they synchronize through two named
//! signals instead of direct references. The bus carries exactly those
//! two signals as a typed enum: no string event names, no payloads.
//!
//! Dispatch is synchronous: [`EventBus::publish`] runs every subscriber
//! callback before it returns. Callers rely on this ordering; e.g.
//! session termination knows all timers have been told to stop before
//! it returns to the UI layer.

use std::sync::{Arc, Mutex};

use tracing::trace;

/// A session-lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was established (login succeeded somewhere).
    SessionStarted,
    /// The session ended: normal logout, forced inactivity logout, or
    /// teardown. Every component holding session-scoped state must
    /// react by releasing its timers and views.
    SessionEnded,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

struct Registry {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Callback)>,
}

/// Process-wide publish/subscribe channel for [`SessionEvent`]s.
///
/// Shared as an `Arc<EventBus>`; injected into consumers rather than
/// living in a global. Subscribers are invoked in subscription order.
///
/// Callbacks are snapshotted out of the registry lock before dispatch,
/// so a callback may subscribe, unsubscribe, or publish reentrantly.
/// A subscriber added during a publish does not receive the event
/// being published.
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Registers a callback for every future publish and returns its id.
    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriberId {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was not (or no
    /// longer) registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let before = registry.subscribers.len();
        registry.subscribers.retain(|(sid, _)| *sid != id);
        registry.subscribers.len() != before
    }

    /// Delivers `event` to every current subscriber, in subscription
    /// order, before returning.
    pub fn publish(&self, event: SessionEvent) {
        let snapshot: Vec<Callback> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect()
        };
        trace!(?event, subscribers = snapshot.len(), "publishing");
        for callback in snapshot {
            callback(&event);
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers_in_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            bus.subscribe(move |event| {
                log.lock().unwrap().push((tag, *event));
            });
        }

        bus.publish(SessionEvent::SessionStarted);

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                ("first", SessionEvent::SessionStarted),
                ("second", SessionEvent::SessionStarted),
                ("third", SessionEvent::SessionStarted),
            ]
        );
    }

    #[test]
    fn test_publish_completes_before_returning() {
        // Synchronous dispatch: the effect of every callback is visible
        // as soon as publish returns.
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        bus.subscribe(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(SessionEvent::SessionEnded);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        let id = bus.subscribe(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(SessionEvent::SessionStarted);
        assert!(bus.unsubscribe(id));
        bus.publish(SessionEvent::SessionEnded);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_returns_false() {
        let bus = EventBus::new();
        let id = bus.subscribe(|_| {});
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_publish_with_no_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish(SessionEvent::SessionStarted);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_reentrant_subscribe_does_not_deadlock() {
        let bus = Arc::new(EventBus::new());
        let bus2 = Arc::clone(&bus);
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late_calls2 = Arc::clone(&late_calls);

        bus.subscribe(move |_| {
            let late_calls = Arc::clone(&late_calls2);
            bus2.subscribe(move |_| {
                late_calls.fetch_add(1, Ordering::SeqCst);
            });
        });

        // The subscriber added mid-publish must not see this event.
        bus.publish(SessionEvent::SessionStarted);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 2);

        // But it does see the next one.
        bus.publish(SessionEvent::SessionEnded);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bus_is_shareable_across_threads() {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        bus.subscribe(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || bus.publish(SessionEvent::SessionStarted))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 4);
    }
}
