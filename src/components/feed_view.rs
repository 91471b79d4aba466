//! Community Feed View Component
//!
//! Shared reels from the feed store. Likes update in place; the list is
//! only re-mounted when a new page of items arrives.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::recipe_feed::{LikeControls, RecipeFeed};
use crate::commands::{self, apply_like_toggle, LikeState};
use crate::context::use_app_context;
use crate::playback::{assemble, BusEvent, CardSource, Topic};
use crate::store::{store_replace_feed, store_update_feed_item, use_app_store, AppStateStoreFields, AppStore};

async fn load_feed(store: AppStore, limit: u32) {
    match commands::get_feed(limit).await {
        Ok(items) => {
            log::info!("[FEED] loaded {} items", items.len());
            store_replace_feed(&store, items);
        }
        Err(e) => log::warn!("[FEED] could not load feed: {}", e),
    }
}

#[component]
pub fn FeedView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let limit = ctx.config().feed_limit;
    let (loading, set_loading) = signal(false);

    let reload = move |force: bool| {
        set_loading.set(true);
        spawn_local(async move {
            if force {
                if let Err(e) = commands::force_refresh().await {
                    log::warn!("[FEED] refresh failed: {}", e);
                }
            }
            load_feed(store, limit).await;
            set_loading.set(false);
        });
    };

    reload(false);

    // Anyone may ask for a refresh over the bus
    let refresh_sub = ctx.bus.with_value(|bus| {
        bus.subscribe(Topic::FeedRefresh, move |_| reload(true))
    });
    let refresh_sub = StoredValue::new_local(Some(refresh_sub));
    on_cleanup(move || {
        let _ = refresh_sub.try_update_value(|s| s.take());
    });

    let on_toggle = Callback::new(move |id: String| {
        // Optimistic, reverted if the host refuses
        store_update_feed_item(&store, &id, apply_like_toggle);
        spawn_local(async move {
            match commands::toggle_like(&id).await {
                Ok(state) => store_update_feed_item(&store, &id, |item| {
                    item.likes = state.likes;
                    item.liked = state.liked;
                }),
                Err(e) => {
                    log::warn!("[FEED] like failed for {}: {}", id, e);
                    store_update_feed_item(&store, &id, apply_like_toggle);
                }
            }
        });
    });

    let lookup = Signal::derive(move || {
        store.feed().with(|items| {
            items
                .iter()
                .map(|item| (item.id.clone(), LikeState { likes: item.likes, liked: item.liked }))
                .collect::<HashMap<_, _>>()
        })
    });
    let likes = LikeControls { lookup, on_toggle };

    view! {
        <div class="feed-toolbar">
            <button
                class="refresh-btn"
                disabled=move || loading.get()
                on:click=move |_| ctx.publish(BusEvent::FeedRefresh)
            >
                {move || if loading.get() { "Refreshing…" } else { "Refresh" }}
            </button>
        </div>
        {move || {
            store.feed_version().track();
            let cards = store.feed().with_untracked(|items| {
                assemble(CardSource::Feed(items), |title, ingredients| ctx.is_favorite(title, ingredients))
            });
            view! { <RecipeFeed cards=cards likes=likes empty_message="The community feed is empty." /> }
        }}
    }
}
