//! Plan View Component
//!
//! Reels for the plan generated from the last photo.

use leptos::prelude::*;

use super::quota_banner::QuotaBanner;
use super::recipe_feed::RecipeFeed;
use crate::context::use_app_context;
use crate::playback::{assemble, CardSource};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn PlanView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    view! {
        <QuotaBanner />
        {move || {
            // Re-mount only when the plan itself changes
            let cards = store.plan().with(|plan| {
                plan.as_ref()
                    .map(|plan| {
                        assemble(CardSource::Plan(plan), |title, ingredients| {
                            ctx.is_favorite(title, ingredients)
                        })
                    })
                    .unwrap_or_default()
            });
            view! { <RecipeFeed cards=cards empty_message="No plan yet. Take a photo first." /> }
        }}
    }
}
