//! Media Element Abstraction
//!
//! The subset of HTMLMediaElement the synchronizer drives. Implemented over
//! the DOM in `crate::dom::media` and by `FakeMedia` in tests.

use crate::error::PlaybackError;

pub trait MediaElement {
    /// Playback position in seconds
    fn current_time(&self) -> f64;
    fn set_current_time(&self, secs: f64);
    /// Duration in seconds; NaN or infinite while unknown
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    /// Enough data buffered to start playing without stalling
    fn has_enough_data(&self) -> bool;
    /// Issue a play request. An `Err` is a synchronous rejection; adapters
    /// report asynchronous rejections through their own channel.
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    /// Currently attached source, if any
    fn source(&self) -> Option<String>;
    /// Attach a source with auto preload and looping
    fn attach_source(&self, url: &str);
    fn set_volume(&self, volume: f64);
}

/// A play request the platform turned down after `play()` returned.
/// `issued_at_ms` is on the same clock as activation times.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRejection {
    pub issued_at_ms: f64,
    pub error: PlaybackError,
}

/// Duration usable for arithmetic
pub fn known_duration(media: &dyn MediaElement) -> Option<f64> {
    let d = media.duration();
    (d.is_finite() && d > 0.0).then_some(d)
}

#[cfg(test)]
pub use fake::FakeMedia;


#[cfg(test)]
pub use fake::looping_video;
