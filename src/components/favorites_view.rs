//! Favorites View Component

use leptos::prelude::*;

use super::recipe_feed::RecipeFeed;
use crate::context::use_app_context;
use crate::playback::{assemble, CardSource, FavoritesStore};

#[component]
pub fn FavoritesView() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        {move || {
            if ctx.user_name().is_none() {
                return view! {
                    <div class="reel-empty">
                        <p>"Sign in to see your saved recipes."</p>
                        <button on:click=move |_| ctx.open_login()>"Sign in"</button>
                    </div>
                }
                .into_any();
            }
            ctx.favorites_version.track();
            let records = ctx.favorites.with_value(|f| f.list());
            let cards = assemble(CardSource::Favorites(&records), |_, _| true);
            view! { <RecipeFeed cards=cards empty_message="No favorites yet. Tap ☆ on a recipe to save it." /> }
                .into_any()
        }}
    }
}
