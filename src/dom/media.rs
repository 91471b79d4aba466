//! HtmlMediaElement Adapter
//!
//! Resolves the element through a `NodeRef` on every call, so a controller
//! can be built before its `<audio>`/`<video>` is mounted and keeps working
//! (as a no-op) after it is gone.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlMediaElement;

use super::now_ms;
use crate::error::PlaybackError;
use crate::playback::{MediaElement, PlayRejection};

/// HTMLMediaElement.HAVE_FUTURE_DATA
const HAVE_FUTURE_DATA: u16 = 3;

#[derive(Clone, Copy)]
pub enum MediaNode {
    Audio(NodeRef<html::Audio>),
    Video(NodeRef<html::Video>),
}

/// One media element owned by a card.
///
/// `play()` returns a promise; its rejection arrives after the call has
/// already returned `Ok`, so it is written to `rejected`, stamped with the
/// time of the request, for the owning component to forward to the
/// controller.
#[derive(Clone, Copy)]
pub struct DomMedia {
    node: MediaNode,
    rejected: WriteSignal<Option<PlayRejection>>,
}

impl DomMedia {
    pub fn new(node: MediaNode, rejected: WriteSignal<Option<PlayRejection>>) -> Self {
        Self { node, rejected }
    }

    fn element(&self) -> Option<HtmlMediaElement> {
        match self.node {
            MediaNode::Audio(node) => node.try_get_untracked().flatten().map(Into::into),
            MediaNode::Video(node) => node.try_get_untracked().flatten().map(Into::into),
        }
    }
}

fn error_name(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "UnknownError".to_string())
}

impl MediaElement for DomMedia {
    fn current_time(&self) -> f64 {
        self.element().map(|el| el.current_time()).unwrap_or(0.0)
    }

    fn set_current_time(&self, secs: f64) {
        if let Some(el) = self.element() {
            el.set_current_time(secs);
        }
    }

    fn duration(&self) -> f64 {
        self.element().map(|el| el.duration()).unwrap_or(f64::NAN)
    }

    fn is_paused(&self) -> bool {
        self.element().map(|el| el.paused()).unwrap_or(true)
    }

    fn has_enough_data(&self) -> bool {
        self.element()
            .map(|el| el.ready_state() >= HAVE_FUTURE_DATA)
            .unwrap_or(false)
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let el = self.element().ok_or(PlaybackError::ElementDetached)?;
        if self.source().is_none() {
            return Err(PlaybackError::NoSource);
        }
        let promise = el
            .play()
            .map_err(|e| PlaybackError::Blocked(error_name(&e)))?;

        let rejected = self.rejected;
        let issued_at_ms = now_ms();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let name = error_name(&e);
                // A pause issued before play settled; not a policy decision
                if name == "AbortError" {
                    log::debug!("[MEDIA] play interrupted by pause");
                    return;
                }
                rejected.set(Some(PlayRejection { issued_at_ms, error: PlaybackError::Blocked(name) }));
            }
        });
        Ok(())
    }

    fn pause(&self) {
        if let Some(el) = self.element() {
            if let Err(e) = el.pause() {
                log::debug!("[MEDIA] pause failed: {}", error_name(&e));
            }
        }
    }

    fn source(&self) -> Option<String> {
        // The attribute, not `src()`: the property is resolved to an
        // absolute URL and would never compare equal to what we attached.
        let el: web_sys::Element = self.element()?.unchecked_into();
        el.get_attribute("src").filter(|s| !s.is_empty())
    }

    fn attach_source(&self, url: &str) {
        if let Some(el) = self.element() {
            el.set_preload("auto");
            el.set_loop(true);
            el.set_src(url);
            el.load();
        }
    }

    fn set_volume(&self, volume: f64) {
        if let Some(el) = self.element() {
            el.set_volume(volume);
        }
    }
}
