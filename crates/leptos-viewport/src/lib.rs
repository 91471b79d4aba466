//! Leptos Viewport Utilities
//!
//! DOM helpers for vertically scrolling card lists.
//! Cards are tagged with a `data-index` attribute; the helpers report
//! intersection ratios and geometry keyed by that index.
//! Every binding detaches when its handle is dropped.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry};

/// Attribute carrying a card's position in its list
pub const INDEX_ATTR: &str = "data-index";

/// One observed card in an intersection batch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub index: usize,
    pub ratio: f64,
}

/// Vertical extent of one card in scroll-content coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardBox {
    pub index: usize,
    pub top: f64,
    pub height: f64,
}

/// Visible window of the scroll container
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportBox {
    pub scroll_top: f64,
    pub height: f64,
}

/// Active index signals shared between a list and its cards
#[derive(Clone, Copy)]
pub struct ActiveIndexSignals {
    pub read: ReadSignal<Option<usize>>,
    pub write: WriteSignal<Option<usize>>,
}

pub fn create_active_index_signals() -> ActiveIndexSignals {
    let (read, write) = signal(None::<usize>);
    ActiveIndexSignals { read, write }
}

/// Read the `data-index` attribute of an element
pub fn parse_index(el: &Element) -> Option<usize> {
    el.get_attribute(INDEX_ATTR)?.parse().ok()
}

/// Live IntersectionObserver; disconnects on drop
pub struct IntersectionBinding {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl IntersectionBinding {
    /// Observe every indexed card inside `container`; returns how many
    pub fn observe_indexed(&self, container: &Element) -> usize {
        let selector = format!("[{}]", INDEX_ATTR);
        let Ok(nodes) = container.query_selector_all(&selector) else {
            return 0;
        };
        let mut observed = 0;
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                self.observer.observe(&el);
                observed += 1;
            }
        }
        observed
    }
}

impl Drop for IntersectionBinding {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe intersections against `root`, shrunk by `root_margin`.
/// Entries without a parsable `data-index` are skipped.
pub fn observe_intersections<F>(
    root: &Element,
    root_margin: &str,
    thresholds: &[f64],
    mut on_batch: F,
) -> Result<IntersectionBinding, JsValue>
where
    F: FnMut(Vec<IntersectionEntry>) + 'static,
{
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let batch: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let index = parse_index(&entry.target())?;
                    Some(IntersectionEntry { index, ratio: entry.intersection_ratio() })
                })
                .collect();
            if !batch.is_empty() {
                on_batch(batch);
            }
        },
    );

    let thresholds_js = js_sys::Array::new();
    for t in thresholds {
        thresholds_js.push(&JsValue::from_f64(*t));
    }

    let init = web_sys::IntersectionObserverInit::new();
    init.set_root(Some(root.as_ref()));
    init.set_root_margin(root_margin);
    init.set_threshold(&thresholds_js);

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    Ok(IntersectionBinding { observer, _callback: callback })
}

/// Event listener registration; removed on drop
pub struct ListenerBinding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for ListenerBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Bind a scroll listener on the container
pub fn bind_scroll<F>(container: &Element, mut on_scroll: F) -> Result<ListenerBinding, JsValue>
where
    F: FnMut() + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| on_scroll());
    let target: EventTarget = container.clone().into();
    target.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())?;
    Ok(ListenerBinding { target, event: "scroll", callback })
}

/// Run `f` on the next animation frame. Returns false without a window.
pub fn request_frame<F>(f: F) -> bool
where
    F: FnOnce() + 'static,
{
    let Some(win) = web_sys::window() else {
        return false;
    };
    let cb = Closure::once_into_js(move |_timestamp: f64| f());
    win.request_animation_frame(cb.unchecked_ref()).is_ok()
}

/// Sample the container viewport and every indexed card inside it
pub fn sample_geometry(container: &Element) -> (ViewportBox, Vec<CardBox>) {
    let viewport = ViewportBox {
        scroll_top: container.scroll_top() as f64,
        height: container.client_height() as f64,
    };
    let container_top = container.get_bounding_client_rect().top();

    let mut cards = Vec::new();
    let selector = format!("[{}]", INDEX_ATTR);
    if let Ok(nodes) = container.query_selector_all(&selector) {
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(index) = parse_index(&el) else { continue };
            let rect = el.get_bounding_client_rect();
            cards.push(CardBox {
                index,
                top: rect.top() - container_top + viewport.scroll_top,
                height: rect.height(),
            });
        }
    }
    (viewport, cards)
}
