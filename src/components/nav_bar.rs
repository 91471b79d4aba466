//! Navigation Bar Component

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{store_reset_to_capture, use_app_store, AppStateStoreFields, View};

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let tab = move |target: View, label: &'static str| {
        view! {
            <button
                class=move || if store.view().get() == target { "nav-tab active" } else { "nav-tab" }
                on:click=move |_| store.view().set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <nav class="nav-bar">
            <button class="nav-tab" on:click=move |_| store_reset_to_capture(&store)>"New photo"</button>
            <Show when=move || store.plan().with(|p| p.is_some())>
                {tab(View::Plan, "My plan")}
            </Show>
            {tab(View::Feed, "Community")}
            <button
                class=move || if store.view().get() == View::Favorites { "nav-tab active" } else { "nav-tab" }
                on:click=move |_| store.view().set(View::Favorites)
            >
                "Favorites"
                <span class="badge">{move || ctx.favorites_count()}</span>
            </button>
            {move || match ctx.user_name() {
                Some(name) => view! {
                    <button class="nav-user" on:click=move |_| ctx.sign_out()>{format!("{} · sign out", name)}</button>
                }.into_any(),
                None => view! {
                    <button class="nav-user" on:click=move |_| ctx.open_login()>"Sign in"</button>
                }.into_any(),
            }}
        </nav>
    }
}
