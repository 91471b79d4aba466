//! Generation Commands
//!
//! Plan from a photo, then one video request per recipe. Per-recipe
//! failures become "no media"; quota exhaustion stops further requests.

use serde::Serialize;

use super::call;
use crate::error::ServiceError;
use crate::models::{CulinaryPlan, Recipe, RecipeVideo, VideoBatch};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanArgs<'a> {
    image_data_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoArgs<'a> {
    recipe_index: usize,
    recipe: &'a Recipe,
}

/// Identify ingredients in the photo and propose recipes
pub async fn generate_plan(image_data_url: &str) -> Result<CulinaryPlan, ServiceError> {
    if !image_data_url.starts_with("data:image/") {
        return Err(ServiceError::Decode("expected an image data URL".into()));
    }
    let plan: CulinaryPlan = call("generate_plan", &PlanArgs { image_data_url }).await?;
    log::info!(
        "[GENERATION] plan: {} ingredients, {} recipes",
        plan.ingredients.len(),
        plan.recipes.len()
    );
    Ok(plan)
}

pub async fn generate_recipe_video(index: usize, recipe: &Recipe) -> Result<RecipeVideo, ServiceError> {
    call("generate_recipe_video", &VideoArgs { recipe_index: index, recipe }).await
}

/// Request videos recipe by recipe, reporting `(done, total)` after each
pub async fn generate_videos<F>(recipes: &[Recipe], mut on_progress: F) -> VideoBatch
where
    F: FnMut(usize, usize),
{
    let mut collector = VideoCollector::new(recipes.len());
    for (index, recipe) in recipes.iter().enumerate() {
        let result = generate_recipe_video(index, recipe).await;
        let keep_going = collector.record(index, result);
        on_progress(collector.done(), collector.total());
        if !keep_going {
            break;
        }
    }
    collector.finish()
}

/// Accumulates per-recipe results into a batch
#[derive(Debug)]
pub struct VideoCollector {
    batch: VideoBatch,
    done: usize,
    total: usize,
}

impl VideoCollector {
    pub fn new(total: usize) -> Self {
        Self { batch: VideoBatch::default(), done: 0, total }
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns false once no further requests should be made
    pub fn record(&mut self, index: usize, result: Result<RecipeVideo, ServiceError>) -> bool {
        self.done += 1;
        match result {
            Ok(video) => {
                let urls: Vec<String> = video
                    .video_urls
                    .into_iter()
                    .filter(|u| !u.trim().is_empty())
                    .collect();
                if !urls.is_empty() {
                    self.batch.videos_by_recipe.insert(index, urls);
                }
                if let Some(storyboard) = video.storyboard {
                    self.batch.storyboards_by_recipe.insert(index, storyboard);
                }
                if video.quota_exceeded {
                    self.batch.quota_exceeded = true;
                }
            }
            Err(ServiceError::QuotaExceeded) => self.batch.quota_exceeded = true,
            Err(e) => log::warn!("[GENERATION] recipe {} left without video: {}", index, e),
        }
        if self.batch.quota_exceeded {
            log::warn!(
                "[GENERATION] quota reached after {}/{}; remaining recipes get no video",
                self.done,
                self.total
            );
            // Report completion so progress reaches the end
            self.done = self.total;
        }
        !self.batch.quota_exceeded
    }

    pub fn finish(self) -> VideoBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Storyboard;

    fn video(url: &str) -> RecipeVideo {
        RecipeVideo {
            video_urls: vec![url.to_string()],
            storyboard: Some(Storyboard {
                hook: "hook".into(),
                voiceover_script: "script".into(),
                caption: "cap".into(),
            }),
            quota_exceeded: false,
        }
    }

    #[test]
    fn failures_become_missing_media() {
        let mut c = VideoCollector::new(3);
        assert!(c.record(0, Ok(video("a.mp4"))));
        assert!(c.record(1, Err(ServiceError::Bridge("timeout".into()))));
        assert!(c.record(2, Ok(RecipeVideo { video_urls: vec![" ".into()], ..Default::default() })));
        assert_eq!(c.done(), 3);

        let batch = c.finish();
        assert_eq!(batch.videos_by_recipe.len(), 1);
        assert!(batch.storyboards_by_recipe.contains_key(&0));
        assert!(!batch.quota_exceeded);
    }

    #[test]
    fn quota_stops_further_requests() {
        let mut c = VideoCollector::new(4);
        assert!(c.record(0, Ok(video("a.mp4"))));
        let mut exhausted = video("b.mp4");
        exhausted.quota_exceeded = true;
        assert!(!c.record(1, Ok(exhausted)));
        assert_eq!(c.done(), 4);

        let batch = c.finish();
        assert!(batch.quota_exceeded);
        // the response that reported exhaustion still delivered its clip
        assert_eq!(batch.videos_by_recipe.len(), 2);
    }

    #[test]
    fn quota_error_stops_too() {
        let mut c = VideoCollector::new(2);
        assert!(!c.record(0, Err(ServiceError::QuotaExceeded)));
        assert!(c.finish().videos_by_recipe.is_empty());
    }
}
