//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{CulinaryPlan, FeedItem};

/// Top-level screens. Only one card list is mounted at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Capture,
    Generating,
    Plan,
    Feed,
    Favorites,
}

/// What the loader shows while a plan is being generated
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationProgress {
    pub stage: String,
    pub done: usize,
    pub total: usize,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub view: View,
    /// Plan from the last capture, media merged in
    pub plan: Option<CulinaryPlan>,
    /// Video generation stopped early on the quota
    pub quota_exceeded: bool,
    pub quota_dismissed: bool,
    pub progress: GenerationProgress,
    /// Last capture or generation failure shown on the capture screen
    pub capture_error: Option<String>,
    pub feed: Vec<FeedItem>,
    /// Bumped whenever the feed list itself is replaced
    pub feed_version: u32,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Start a fresh generation run
pub fn store_begin_generation(store: &AppStore) {
    store.plan().set(None);
    store.quota_exceeded().set(false);
    store.quota_dismissed().set(false);
    store.capture_error().set(None);
    store.progress().set(GenerationProgress {
        stage: "Looking at your ingredients".to_string(),
        ..Default::default()
    });
    store.view().set(View::Generating);
}

pub fn store_set_progress(store: &AppStore, stage: &str, done: usize, total: usize) {
    store.progress().set(GenerationProgress { stage: stage.to_string(), done, total });
}

pub fn store_finish_generation(store: &AppStore, plan: CulinaryPlan, quota_exceeded: bool) {
    store.quota_exceeded().set(quota_exceeded);
    store.plan().set(Some(plan));
    store.view().set(View::Plan);
}

pub fn store_fail_generation(store: &AppStore, message: String) {
    store.capture_error().set(Some(message));
    store.view().set(View::Capture);
}

/// "New photo": drop the plan, which unmounts its cards
pub fn store_reset_to_capture(store: &AppStore) {
    store.plan().set(None);
    store.quota_exceeded().set(false);
    store.capture_error().set(None);
    store.view().set(View::Capture);
}

pub fn store_replace_feed(store: &AppStore, items: Vec<FeedItem>) {
    store.feed().set(items);
    store.feed_version().update(|v| *v += 1);
}

/// Apply `f` to the feed item with `id`, without replacing the list
pub fn store_update_feed_item(store: &AppStore, id: &str, f: impl FnOnce(&mut FeedItem)) {
    if let Some(item) = store.feed().write().iter_mut().find(|item| item.id == id) {
        f(item);
    }
}
