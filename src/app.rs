//! Recipe Reels App
//!
//! Navigation plus one screen at a time. Owns the app-wide bus
//! subscriptions: login prompts and favorites badge refreshes.

use leptos::prelude::*;

use crate::components::{CaptureForm, FavoritesView, FeedView, GenerationLoader, LoginPrompt, NavBar, PlanView};
use crate::config::PlaybackConfig;
use crate::context::AppContext;
use crate::playback::Topic;
use crate::store::{AppState, AppStateStoreFields, AppStore, View};

#[component]
pub fn App() -> impl IntoView {
    let config = PlaybackConfig::load();
    log::info!("[APP] starting with {:?}", config);

    let ctx = AppContext::new(config);
    provide_context(ctx);
    let store: AppStore = reactive_stores::Store::new(AppState::default());
    provide_context(store);

    // App-lifetime subscriptions
    let subscriptions = ctx.bus.with_value(|bus| {
        vec![
            bus.subscribe(Topic::LoginRequired, move |_| {
                log::info!("[APP] sign-in required");
                ctx.open_login();
            }),
            bus.subscribe(Topic::FavoritesChanged, move |_| ctx.notify_favorites_changed()),
        ]
    });
    let _subscriptions = StoredValue::new_local(subscriptions);

    view! {
        <div class="app-layout">
            <NavBar />
            <main class="main-content">
                {move || match store.view().get() {
                    View::Capture => view! { <CaptureForm /> }.into_any(),
                    View::Generating => view! { <GenerationLoader /> }.into_any(),
                    View::Plan => view! { <PlanView /> }.into_any(),
                    View::Feed => view! { <FeedView /> }.into_any(),
                    View::Favorites => view! { <FavoritesView /> }.into_any(),
                }}
            </main>
            <LoginPrompt />
        </div>
    }
}
