//! Frame Sampler
//!
//! Coalesces bursts of scroll events into at most one sample per animation
//! frame. The frame source is a trait so tests can drive frames by hand.

use std::cell::Cell;
use std::rc::Rc;

/// Source of animation frames
pub trait FrameScheduler {
    /// Run `callback` on the next frame
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Debounced sampler: one pending frame at a time
#[derive(Default)]
pub struct FrameSampler {
    pending: Cell<bool>,
    cancelled: Cell<bool>,
    samples: Cell<u64>,
}

impl FrameSampler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Ask for a sample on the next frame. Returns false when a frame is
    /// already pending (the sample will see the latest state anyway) or the
    /// sampler is cancelled.
    pub fn schedule<S, F>(self: &Rc<Self>, scheduler: &S, sample: F) -> bool
    where
        S: FrameScheduler + ?Sized,
        F: FnOnce() + 'static,
    {
        if self.cancelled.get() || self.pending.replace(true) {
            return false;
        }
        let sampler = Rc::clone(self);
        scheduler.request_frame(Box::new(move || {
            sampler.pending.set(false);
            if sampler.cancelled.get() {
                return;
            }
            sampler.samples.set(sampler.samples.get() + 1);
            sample();
        }));
        true
    }

    /// Pending frames become no-ops and nothing new is scheduled
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Samples actually taken
    pub fn sample_count(&self) -> u64 {
        self.samples.get()
    }
}

/// Manually advanced frame clock
#[cfg(test)]
#[derive(Default)]
pub struct FakeFrames {
    queue: std::cell::RefCell<Vec<Box<dyn FnOnce()>>>,
}

#[cfg(test)]
impl FakeFrames {
    /// Run every callback queued before this frame
    pub fn advance(&self) -> usize {
        let due: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let n = due.len();
        for cb in due {
            cb();
        }
        n
    }

    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[cfg(test)]
impl FrameScheduler for FakeFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_scrolls_yields_one_sample_per_frame() {
        let frames = FakeFrames::default();
        let sampler = FrameSampler::new();
        let hits = Rc::new(Cell::new(0));

        for _ in 0..10 {
            let h = Rc::clone(&hits);
            sampler.schedule(&frames, move || h.set(h.get() + 1));
        }
        assert_eq!(frames.queued(), 1);
        assert!(sampler.is_pending());

        frames.advance();
        assert_eq!(hits.get(), 1);
        assert!(!sampler.is_pending());

        let h = Rc::clone(&hits);
        assert!(sampler.schedule(&frames, move || h.set(h.get() + 1)));
        frames.advance();
        assert_eq!(hits.get(), 2);
        assert_eq!(sampler.sample_count(), 2);
    }

    #[test]
    fn cancel_drops_pending_frame() {
        let frames = FakeFrames::default();
        let sampler = FrameSampler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        sampler.schedule(&frames, move || h.set(1));

        sampler.cancel();
        frames.advance();
        assert_eq!(hits.get(), 0);
        assert!(!sampler.schedule(&frames, || {}));
        assert_eq!(frames.queued(), 0);
    }
}
