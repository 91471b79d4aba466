//! DOM Adapters
//!
//! Browser implementations of the playback core's traits.

mod file;
mod frames;
mod media;

pub use file::read_as_data_url;
pub use frames::RafScheduler;
pub use media::{DomMedia, MediaNode};

/// Monotonic milliseconds for drift deadlines
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
