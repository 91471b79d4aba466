//! Playback Arbiter
//!
//! Keeps at most one card audible. The newly active card announces its
//! index on the bus; every other member stops itself synchronously inside
//! the announcement. There is no lock and no acknowledgement: the announcer
//! starts its own media right after `announce` returns, by which point all
//! stops have already run.

use super::bus::{BusEvent, EventBus, Subscription, Topic};

#[derive(Clone)]
pub struct PlaybackArbiter {
    bus: EventBus,
}

impl PlaybackArbiter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Broadcast that `index` owns playback. Returns the number of members
    /// that heard it.
    pub fn announce(&self, index: usize) -> usize {
        log::debug!("[ARBITER] card {} takes playback", index);
        self.bus.publish(BusEvent::ActivateCard { index })
    }

    /// Register card `index`. `on_stop` runs for every announcement by a
    /// different card and must be synchronous and idempotent.
    #[must_use = "dropping the membership leaves the arbitration"]
    pub fn join<F>(&self, index: usize, on_stop: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.bus.subscribe(Topic::ActivateCard, move |event| {
            if let BusEvent::ActivateCard { index: active } = event {
                if *active != index {
                    on_stop();
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn announcement_stops_everyone_but_the_announcer() {
        let arbiter = PlaybackArbiter::new(EventBus::new());
        let stops: Vec<Rc<Cell<u32>>> = (0..3).map(|_| Rc::new(Cell::new(0))).collect();
        let _members: Vec<Subscription> = stops
            .iter()
            .enumerate()
            .map(|(i, counter)| {
                let c = Rc::clone(counter);
                arbiter.join(i, move || c.set(c.get() + 1))
            })
            .collect();

        assert_eq!(arbiter.announce(1), 3);
        assert_eq!(stops[0].get(), 1);
        assert_eq!(stops[1].get(), 0);
        assert_eq!(stops[2].get(), 1);
    }

    #[test]
    fn left_members_hear_nothing() {
        let arbiter = PlaybackArbiter::new(EventBus::new());
        let stopped = Rc::new(Cell::new(false));
        let s = Rc::clone(&stopped);
        let membership = arbiter.join(0, move || s.set(true));
        drop(membership);

        assert_eq!(arbiter.announce(4), 0);
        assert!(!stopped.get());
    }

    #[test]
    fn other_topics_do_not_stop_members() {
        let arbiter = PlaybackArbiter::new(EventBus::new());
        let stopped = Rc::new(Cell::new(false));
        let s = Rc::clone(&stopped);
        let _m = arbiter.join(0, move || s.set(true));

        arbiter.bus().publish(BusEvent::FeedRefresh);
        assert!(!stopped.get());
    }
}
