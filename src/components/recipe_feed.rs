//! Recipe Feed Component
//!
//! Vertical snap-scrolling list of reels. Owns the visibility tracker and
//! both of its estimators:
//! - an IntersectionObserver against the centre band of the container
//! - a scroll listener sampled once per animation frame
//!
//! Either may move the active index; cards react to it on their own.

use std::collections::HashMap;

use leptos::html;
use leptos::prelude::*;
use leptos_viewport::{
    bind_scroll, create_active_index_signals, observe_intersections, sample_geometry,
    IntersectionBinding, ListenerBinding,
};

use super::recipe_card::ReelCard;
use crate::commands::LikeState;
use crate::context::use_app_context;
use crate::dom::RafScheduler;
use crate::playback::{FrameSampler, RecipeCard, VisibilityTracker};

/// Like counts for feed cards, keyed by item id
#[derive(Clone, Copy)]
pub struct LikeControls {
    pub lookup: Signal<HashMap<String, LikeState>>,
    pub on_toggle: Callback<String>,
}

/// DOM bindings torn down with the list
#[derive(Default)]
struct FeedBindings {
    _intersections: Option<IntersectionBinding>,
    _scroll: Option<ListenerBinding>,
}

#[component]
pub fn RecipeFeed(
    cards: Vec<RecipeCard>,
    #[prop(optional)] likes: Option<LikeControls>,
    /// Shown when `cards` is empty
    #[prop(into, default = "Nothing here yet".to_string())]
    empty_message: String,
) -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();
    let count = cards.len();

    let container_ref = NodeRef::<html::Div>::new();
    let active = create_active_index_signals();
    let tracker = StoredValue::new_local(VisibilityTracker::new(count));
    let sampler = StoredValue::new_local(FrameSampler::new());
    let bindings = StoredValue::new_local(FeedBindings::default());

    let publish = move |index: Option<usize>| {
        if let Some(i) = index {
            log::debug!("[FEED] active index -> {}", i);
            active.write.set(Some(i));
        }
    };

    Effect::new(move |_| {
        let Some(container) = container_ref.get() else {
            return;
        };
        let root: web_sys::Element = container.into();

        let observer = observe_intersections(
            &root,
            &config.intersection_root_margin,
            &config.intersection_thresholds,
            move |batch| {
                let published = tracker
                    .try_update_value(|t| t.on_intersections(&batch))
                    .flatten();
                publish(published);
            },
        );
        let observer = match observer {
            Ok(observer) => {
                let observed = observer.observe_indexed(&root);
                log::debug!("[FEED] observing {} cards", observed);
                Some(observer)
            }
            Err(e) => {
                log::warn!("[FEED] intersection observer unavailable: {:?}", e);
                None
            }
        };

        let frames = sampler.get_value();
        let scroll = bind_scroll(&root, move || {
            frames.schedule(&RafScheduler, move || {
                let Some(container) = container_ref.try_get_untracked().flatten() else {
                    return;
                };
                let (viewport, boxes) = sample_geometry(&container);
                let published = tracker
                    .try_update_value(|t| t.on_scroll_sample(viewport, &boxes))
                    .flatten();
                publish(published);
            });
        });
        let scroll = match scroll {
            Ok(binding) => Some(binding),
            Err(e) => {
                log::warn!("[FEED] scroll listener failed: {:?}", e);
                None
            }
        };

        bindings.set_value(FeedBindings { _intersections: observer, _scroll: scroll });
        publish(tracker.try_update_value(|t| t.mount()).flatten());
    });

    on_cleanup(move || {
        let _ = sampler.try_with_value(|s| s.cancel());
        let _ = tracker.try_update_value(|t| t.detach());
        let _ = bindings.try_update_value(|b| std::mem::take(b));
        log::debug!("[FEED] list unmounted");
    });

    if cards.is_empty() {
        return view! { <div class="reel-empty">{empty_message}</div> }.into_any();
    }

    view! {
        <div class="reel-feed" node_ref=container_ref>
            {cards
                .into_iter()
                .enumerate()
                .map(|(index, card)| {
                    view! { <ReelCard index=index card=card active=active.read likes=likes /> }
                })
                .collect_view()}
        </div>
    }
    .into_any()
}
