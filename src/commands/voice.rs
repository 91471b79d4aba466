//! Voice Commands

use std::collections::HashMap;

use serde::Serialize;

use super::call;
use crate::error::ServiceError;
use crate::models::Storyboard;

#[derive(Serialize)]
struct ScriptArgs<'a> {
    script: &'a str,
}

/// Synthesize narration; resolves to an audio URL
pub async fn synthesize_voiceover(script: &str) -> Result<String, ServiceError> {
    let url: String = call("synthesize_voiceover", &ScriptArgs { script }).await?;
    if url.trim().is_empty() {
        return Err(ServiceError::Decode("empty voiceover url".into()));
    }
    Ok(url)
}

/// Narrate every storyboard with a script. Failures leave that recipe silent.
pub async fn synthesize_voiceovers(storyboards: &HashMap<usize, Storyboard>) -> HashMap<usize, String> {
    let mut indices: Vec<usize> = storyboards
        .iter()
        .filter(|(_, s)| !s.voiceover_script.trim().is_empty())
        .map(|(i, _)| *i)
        .collect();
    indices.sort_unstable();

    let mut voiceovers = HashMap::new();
    for index in indices {
        let script = &storyboards[&index].voiceover_script;
        match synthesize_voiceover(script).await {
            Ok(url) => {
                voiceovers.insert(index, url);
            }
            Err(e) => log::warn!("[VOICE] recipe {} stays silent: {}", index, e),
        }
    }
    voiceovers
}
