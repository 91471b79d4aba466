//! Plan/Feed Assembly
//!
//! Turns a generated plan, the community feed or the favorites list into one
//! ordered list of cards. Missing media is resolved here, once:
//! - no video urls -> gradient backdrop
//! - no storyboard -> empty hook and caption
//! - no voiceover -> no narration, so no synchronizer for that card

use crate::models::{CulinaryPlan, FavoriteRecord, FeedItem, Recipe, Storyboard};

/// Backdrops for cards without a video, picked by position
pub const GRADIENTS: [&str; 6] = [
    "linear-gradient(160deg, #ff9a56 0%, #ff5e62 100%)",
    "linear-gradient(160deg, #43cea2 0%, #185a9d 100%)",
    "linear-gradient(160deg, #f7971e 0%, #ffd200 100%)",
    "linear-gradient(160deg, #8e2de2 0%, #4a00e0 100%)",
    "linear-gradient(160deg, #00b09b 0%, #96c93d 100%)",
    "linear-gradient(160deg, #ee0979 0%, #ff6a00 100%)",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Backdrop {
    /// Clips played in order, looping
    Video(Vec<String>),
    Gradient(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardCaption {
    pub hook: String,
    pub caption: String,
}

/// Where a card came from
#[derive(Debug, Clone, PartialEq)]
pub enum CardOrigin {
    Plan,
    Feed { likes: u32, liked: bool },
    Favorite { saved_at: f64 },
}

/// Card view-model. Immutable once built, except `is_favorited`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCard {
    pub id: String,
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub storyboard: Option<Storyboard>,
    pub backdrop: Backdrop,
    pub narration: Option<String>,
    pub caption: CardCaption,
    pub is_favorited: bool,
    pub origin: CardOrigin,
}

impl RecipeCard {
    pub fn video_urls(&self) -> &[String] {
        match &self.backdrop {
            Backdrop::Video(urls) => urls,
            Backdrop::Gradient(_) => &[],
        }
    }

    /// Needs a media synchronizer
    pub fn is_narrated(&self) -> bool {
        self.narration.is_some()
    }
}

/// The three card sources
pub enum CardSource<'a> {
    Plan(&'a CulinaryPlan),
    Feed(&'a [FeedItem]),
    Favorites(&'a [FavoriteRecord]),
}

/// Build the card list for any source. `is_favorite(title, ingredients)`
/// marks cards already saved; favorites are always marked.
pub fn assemble<F>(source: CardSource<'_>, is_favorite: F) -> Vec<RecipeCard>
where
    F: Fn(&str, &[String]) -> bool,
{
    match source {
        CardSource::Plan(plan) => cards_from_plan(plan, is_favorite),
        CardSource::Feed(items) => cards_from_feed(items, is_favorite),
        CardSource::Favorites(records) => cards_from_favorites(records),
    }
}

pub fn cards_from_plan<F>(plan: &CulinaryPlan, is_favorite: F) -> Vec<RecipeCard>
where
    F: Fn(&str, &[String]) -> bool,
{
    let ingredients = plan.ingredient_list();
    plan.recipes
        .iter()
        .enumerate()
        .map(|(i, recipe)| {
            let favorited = is_favorite(&recipe.title, &ingredients);
            build_card(
                format!("plan-{}-{}", i, slug(&recipe.title)),
                i,
                recipe.clone(),
                ingredients.clone(),
                plan.storyboards.get(&i).cloned(),
                plan.videos.get(&i).map(Vec::as_slice).unwrap_or(&[]),
                plan.voiceovers.get(&i).map(String::as_str),
                favorited,
                CardOrigin::Plan,
            )
        })
        .collect()
}

pub fn cards_from_feed<F>(items: &[FeedItem], is_favorite: F) -> Vec<RecipeCard>
where
    F: Fn(&str, &[String]) -> bool,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            build_card(
                item.id.clone(),
                i,
                item.recipe.clone(),
                item.ingredients.clone(),
                item.storyboard.clone(),
                &item.video_urls,
                item.voiceover_url.as_deref(),
                is_favorite(&item.recipe.title, &item.ingredients),
                CardOrigin::Feed { likes: item.likes, liked: item.liked },
            )
        })
        .collect()
}

/// Newest first
pub fn cards_from_favorites(records: &[FavoriteRecord]) -> Vec<RecipeCard> {
    let mut sorted: Vec<&FavoriteRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.saved_at.total_cmp(&a.saved_at));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            build_card(
                record.id.clone(),
                i,
                record.recipe.clone(),
                record.ingredients.clone(),
                record.storyboard.clone(),
                &record.video_urls,
                record.voiceover_url.as_deref(),
                true,
                CardOrigin::Favorite { saved_at: record.saved_at },
            )
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn build_card(
    id: String,
    position: usize,
    recipe: Recipe,
    ingredients: Vec<String>,
    storyboard: Option<Storyboard>,
    video_urls: &[String],
    voiceover_url: Option<&str>,
    is_favorited: bool,
    origin: CardOrigin,
) -> RecipeCard {
    let urls: Vec<String> = video_urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();
    let backdrop = if urls.is_empty() {
        Backdrop::Gradient(GRADIENTS[position % GRADIENTS.len()])
    } else {
        Backdrop::Video(urls)
    };
    let narration = voiceover_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    let caption = storyboard
        .as_ref()
        .map(|s| CardCaption { hook: s.hook.clone(), caption: s.caption.clone() })
        .unwrap_or_default();

    RecipeCard {
        id,
        recipe,
        ingredients,
        storyboard,
        backdrop,
        narration,
        caption,
        is_favorited,
        origin,
    }
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}
