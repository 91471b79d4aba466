use crate::playback::FrameScheduler;

/// Schedules samples on `requestAnimationFrame`
#[derive(Clone, Copy, Default)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        if !leptos_viewport::request_frame(callback) {
            log::debug!("[FRAMES] no window, frame request dropped");
        }
    }
}
