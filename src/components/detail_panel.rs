//! Detail Panel Component
//!
//! Full recipe over the card: steps, ingredients on hand, missing items.

use leptos::prelude::*;

use crate::models::Recipe;

#[component]
pub fn DetailPanel(
    recipe: Recipe,
    ingredients: Vec<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    let missing = recipe.missing_items.clone();
    view! {
        <div class="detail-panel" on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()>
            <div class="detail-header">
                <h3>{recipe.title.clone()}</h3>
                <button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
            </div>
            <p class="detail-meta">
                {format!("{} min · {}", recipe.time_minutes, recipe.difficulty)}
            </p>

            <h4>"You have"</h4>
            <ul class="detail-ingredients">
                {ingredients.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
            </ul>

            <Show when={
                let empty = missing.is_empty();
                move || !empty
            }>
                <h4>"You'll also need"</h4>
                <ul class="detail-missing">
                    {missing.clone().into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
                </ul>
            </Show>

            <h4>"Steps"</h4>
            <ol class="detail-steps">
                {recipe.steps.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
            </ol>
        </div>
    }
}
