//! Frontend Models
//!
//! Data structures exchanged with the host bridge and browser storage.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Recipe as returned by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub time_minutes: u32,
    pub difficulty: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub missing_items: Vec<String>,
}

/// Narration and caption metadata for a recipe video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    pub hook: String,
    pub voiceover_script: String,
    pub caption: String,
}

/// Ingredients, recipes and whatever media was generated for them.
/// Per-recipe maps are keyed by the recipe's index in `recipes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulinaryPlan {
    pub ingredients: BTreeSet<String>,
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub videos: HashMap<usize, Vec<String>>,
    #[serde(default)]
    pub storyboards: HashMap<usize, Storyboard>,
    #[serde(default)]
    pub voiceovers: HashMap<usize, String>,
}

impl CulinaryPlan {
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients.iter().cloned().collect()
    }
}

/// Result of one per-recipe video request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeVideo {
    #[serde(default)]
    pub video_urls: Vec<String>,
    pub storyboard: Option<Storyboard>,
    #[serde(default)]
    pub quota_exceeded: bool,
}

/// Accumulated video generation results for a plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoBatch {
    pub videos_by_recipe: HashMap<usize, Vec<String>>,
    pub storyboards_by_recipe: HashMap<usize, Storyboard>,
    pub quota_exceeded: bool,
}

impl CulinaryPlan {
    /// Merge generated media. Empty url lists are dropped so "no media"
    /// has a single representation.
    pub fn apply_video_batch(&mut self, batch: VideoBatch) {
        for (index, urls) in batch.videos_by_recipe {
            if index < self.recipes.len() && !urls.is_empty() {
                self.videos.insert(index, urls);
            }
        }
        for (index, storyboard) in batch.storyboards_by_recipe {
            if index < self.recipes.len() {
                self.storyboards.insert(index, storyboard);
            }
        }
    }
}

/// Item of the shared community feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub recipe: Recipe,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub storyboard: Option<Storyboard>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    pub voiceover_url: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked: bool,
}

/// Stored favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub id: String,
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub storyboard: Option<Storyboard>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    pub voiceover_url: Option<String>,
    /// Milliseconds since epoch
    pub saved_at: f64,
}

/// Favorite to be added (the store assigns id and timestamp)
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub storyboard: Option<Storyboard>,
    pub video_urls: Vec<String>,
    pub voiceover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
pub(crate) fn sample_recipe(title: &str) -> Recipe {
    Recipe {
        title: title.to_string(),
        time_minutes: 20,
        difficulty: "easy".to_string(),
        steps: vec!["Chop".to_string(), "Cook".to_string()],
        missing_items: vec![],
    }
}
