//! Generation Loader Component
//!
//! Spinner, progress and a rotating cooking tip while a plan is generated.

use gloo_timers::callback::Interval;
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

const TIPS: &[&str] = &[
    "Salt pasta water until it tastes like the sea.",
    "Let meat rest after cooking so the juices settle.",
    "Toast spices in a dry pan to wake them up.",
    "A squeeze of lemon brightens almost any dish.",
    "Pat vegetables dry before roasting for better browning.",
    "Keep a bowl for scraps; it makes cleanup quicker.",
];

/// Tip shown after `ticks` rotations
pub fn tip_at(ticks: usize) -> &'static str {
    TIPS[ticks % TIPS.len()]
}

#[component]
pub fn GenerationLoader() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (ticks, set_ticks) = signal(0usize);

    // Rotation timer dies with the loader
    let rotation = StoredValue::new_local(Some(Interval::new(ctx.config().tip_rotation_ms, move || {
        set_ticks.update(|t| *t += 1);
    })));
    on_cleanup(move || {
        let _ = rotation.try_update_value(|r| r.take());
    });

    let progress_text = move || {
        let p = store.progress().get();
        if p.total > 0 {
            format!("{} ({}/{})", p.stage, p.done, p.total)
        } else {
            p.stage
        }
    };

    view! {
        <div class="generation-loader">
            <div class="spinner" />
            <p class="loader-stage">{progress_text}</p>
            <p class="loader-tip">{move || tip_at(ticks.get())}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tips_rotate_and_wrap() {
        assert_eq!(tip_at(0), TIPS[0]);
        assert_eq!(tip_at(1), TIPS[1]);
        assert_eq!(tip_at(TIPS.len()), TIPS[0]);
    }
}
