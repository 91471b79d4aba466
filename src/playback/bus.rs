//! Event Bus
//!
//! In-process publish/subscribe channel with named topics. Cards never hold
//! references to each other; every cross-card effect goes through here.
//!
//! Delivery is synchronous: `publish` returns only after every matching
//! listener has run, so a stop broadcast is complete before the publisher
//! continues.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Broadcast message
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// The card at `index` now owns playback; everyone else stops
    ActivateCard { index: usize },
    LoginRequired,
    FeedRefresh,
    /// Favorites were added or removed; counts may be stale
    FavoritesChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ActivateCard,
    LoginRequired,
    FeedRefresh,
    FavoritesChanged,
}

impl BusEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::ActivateCard { .. } => Topic::ActivateCard,
            BusEvent::LoginRequired => Topic::LoginRequired,
            BusEvent::FeedRefresh => Topic::FeedRefresh,
            BusEvent::FavoritesChanged => Topic::FavoritesChanged,
        }
    }
}

type Listener = Rc<dyn Fn(&BusEvent)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, Topic, Listener)>,
}

impl BusInner {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _, _)| *lid == id)
    }
}

/// Shared handle to one bus; clones publish to the same listeners
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, topic: Topic, listener: F) -> Subscription
    where
        F: Fn(&BusEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, topic, Rc::new(listener)));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver to every listener of the event's topic in registration order.
    /// Listeners may publish or unsubscribe re-entrantly; one removed during
    /// delivery is not called afterwards. Returns the number of listeners run.
    pub fn publish(&self, event: BusEvent) -> usize {
        let topic = event.topic();
        let targets: Vec<(u64, Listener)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .map(|(id, _, l)| (*id, Rc::clone(l)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            listener(&event);
            delivered += 1;
        }
        delivered
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .count()
    }
}

/// RAII registration handle
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _, _)| *id != self.id);
        }
    }
}
