//! Host Bridge Command Wrappers
//!
//! Frontend bindings to the host's generation, voice, feed and assistant
//! commands, organized by domain. The host exposes
//! `window.recipeReels.invoke(cmd, args)` returning a promise.

mod assistant;
mod feed;
mod generation;
mod voice;

use wasm_bindgen::prelude::*;

use crate::error::ServiceError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["window", "recipeReels"])]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

// Re-export all public items
pub use assistant::*;
pub use feed::*;
pub use generation::*;
pub use voice::*;

/// Invoke `cmd` and decode its result
async fn call<A, T>(cmd: &str, args: &A) -> Result<T, ServiceError>
where
    A: serde::Serialize + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let js_args = serde_wasm_bindgen::to_value(args)?;
    let result = invoke(cmd, js_args).await.map_err(|e| bridge_error(cmd, &e))?;
    Ok(serde_wasm_bindgen::from_value(result)?)
}

/// Invoke `cmd` for its side effect only
async fn call_unit<A>(cmd: &str, args: &A) -> Result<(), ServiceError>
where
    A: serde::Serialize + ?Sized,
{
    let js_args = serde_wasm_bindgen::to_value(args)?;
    invoke(cmd, js_args).await.map_err(|e| bridge_error(cmd, &e))?;
    Ok(())
}

fn bridge_error(cmd: &str, err: &JsValue) -> ServiceError {
    let message = err
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", err));
    classify_failure(cmd, &message)
}

/// Hosts report exhaustion as a message; everything else is a plain failure
pub(crate) fn classify_failure(cmd: &str, message: &str) -> ServiceError {
    let lower = message.to_lowercase();
    if lower.contains("quota") || lower.contains("resource_exhausted") || lower.contains("429") {
        log::warn!("[BRIDGE] {} hit the quota: {}", cmd, message);
        ServiceError::QuotaExceeded
    } else {
        log::error!("[BRIDGE] {} failed: {}", cmd, message);
        ServiceError::Bridge(format!("{}: {}", cmd, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_messages_are_classified() {
        assert_eq!(
            classify_failure("generate_recipe_video", "429 RESOURCE_EXHAUSTED"),
            ServiceError::QuotaExceeded
        );
        assert_eq!(
            classify_failure("generate_plan", "network down"),
            ServiceError::Bridge("generate_plan: network down".into())
        );
    }
}
