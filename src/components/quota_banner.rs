//! Quota Banner Component

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

/// Shown over a plan whose video generation stopped on the quota
#[component]
pub fn QuotaBanner() -> impl IntoView {
    let store = use_app_store();
    let visible = move || store.quota_exceeded().get() && !store.quota_dismissed().get();

    view! {
        <Show when=visible>
            <div class="quota-banner">
                <span>"Video quota reached. Some recipes are shown without video."</span>
                <button class="close-btn" on:click=move |_| store.quota_dismissed().set(true)>"×"</button>
            </div>
        </Show>
    }
}
