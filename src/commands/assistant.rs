//! Assistant Commands

use leptos::task::spawn_local;
use serde::Serialize;

use super::call_unit;
use crate::error::ServiceError;
use crate::models::{Recipe, Storyboard};
use crate::playback::{AssistantContext, AssistantLauncher};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantArgs<'a> {
    recipe: &'a Recipe,
    ingredients: &'a [String],
    storyboard: Option<&'a Storyboard>,
}

/// Open the host's cooking assistant on one recipe
pub async fn open_assistant(context: &AssistantContext) -> Result<(), ServiceError> {
    call_unit(
        "open_assistant",
        &AssistantArgs {
            recipe: &context.recipe,
            ingredients: &context.ingredients,
            storyboard: context.storyboard.as_ref(),
        },
    )
    .await
}

/// Fire-and-forget launcher used by cards
#[derive(Clone, Copy, Default)]
pub struct BridgeAssistant;

impl AssistantLauncher for BridgeAssistant {
    fn open(&self, context: AssistantContext) {
        log::info!("[ASSISTANT] opening for {}", context.recipe.title);
        spawn_local(async move {
            if let Err(e) = open_assistant(&context).await {
                log::warn!("[ASSISTANT] could not open: {}", e);
            }
        });
    }
}
