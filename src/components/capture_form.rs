//! Capture Form Component
//!
//! Photo input that kicks off the generation pipeline:
//! plan -> one video per recipe -> narration per storyboard.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::commands;
use crate::dom::read_as_data_url;
use crate::store::{
    store_begin_generation, store_fail_generation, store_finish_generation, store_set_progress,
    use_app_store, AppStateStoreFields, AppStore,
};

/// Run the whole pipeline for one photo. Only a failed plan aborts;
/// missing videos or narration leave those recipes without media.
async fn generate(store: AppStore, image_data_url: String) {
    store_begin_generation(&store);

    let mut plan = match commands::generate_plan(&image_data_url).await {
        Ok(plan) if !plan.recipes.is_empty() => plan,
        Ok(_) => {
            store_fail_generation(&store, "No recipes found for that photo. Try another angle.".into());
            return;
        }
        Err(e) => {
            log::error!("[CAPTURE] plan generation failed: {}", e);
            store_fail_generation(&store, format!("Could not read your ingredients: {}", e));
            return;
        }
    };

    store_set_progress(&store, "Filming your recipes", 0, plan.recipes.len());
    let batch = commands::generate_videos(&plan.recipes, |done, total| {
        store_set_progress(&store, "Filming your recipes", done, total);
    })
    .await;
    let quota_exceeded = batch.quota_exceeded;
    plan.apply_video_batch(batch);

    let scripted = plan.storyboards.len();
    store_set_progress(&store, "Recording narration", 0, scripted);
    plan.voiceovers = commands::synthesize_voiceovers(&plan.storyboards).await;
    store_set_progress(&store, "Recording narration", scripted, scripted);

    log::info!(
        "[CAPTURE] plan ready: {} recipes, {} with video, {} narrated",
        plan.recipes.len(),
        plan.videos.len(),
        plan.voiceovers.len()
    );
    store_finish_generation(&store, plan, quota_exceeded);
}

#[component]
pub fn CaptureForm() -> impl IntoView {
    let store = use_app_store();

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        input.set_value("");
        spawn_local(async move {
            match read_as_data_url(&file).await {
                Ok(data_url) => generate(store, data_url).await,
                Err(e) => store_fail_generation(&store, e.to_string()),
            }
        });
    };

    view! {
        <div class="capture">
            <h1>"What's in your fridge?"</h1>
            <p>"Snap your ingredients and get recipe reels to cook from."</p>
            <label class="capture-button">
                "Take a photo"
                <input type="file" accept="image/*" capture="environment" on:change=on_change />
            </label>
            {move || store.capture_error().get().map(|e| view! { <p class="form-error">{e}</p> })}
        </div>
    }
}
