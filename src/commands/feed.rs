//! Feed Commands

use serde::{Deserialize, Serialize};

use super::{call, call_unit};
use crate::error::ServiceError;
use crate::models::FeedItem;

#[derive(Serialize)]
struct LimitArgs {
    limit: u32,
}

#[derive(Serialize)]
struct IdArgs<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct NoArgs {}

/// Like state after a toggle, as confirmed by the host
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LikeState {
    pub likes: u32,
    pub liked: bool,
}

pub async fn get_feed(limit: u32) -> Result<Vec<FeedItem>, ServiceError> {
    call("get_feed", &LimitArgs { limit }).await
}

pub async fn toggle_like(id: &str) -> Result<LikeState, ServiceError> {
    call("toggle_like", &IdArgs { id }).await
}

/// Drop the host's cached feed
pub async fn force_refresh() -> Result<(), ServiceError> {
    call_unit("force_refresh", &NoArgs {}).await
}

/// Optimistic like flip applied before the host answers
pub fn apply_like_toggle(item: &mut FeedItem) {
    if item.liked {
        item.likes = item.likes.saturating_sub(1);
    } else {
        item.likes += 1;
    }
    item.liked = !item.liked;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_recipe;

    #[test]
    fn like_toggle_is_reversible() {
        let mut item = FeedItem {
            id: "f".into(),
            recipe: sample_recipe("Ramen"),
            ingredients: vec![],
            storyboard: None,
            video_urls: vec![],
            voiceover_url: None,
            likes: 0,
            liked: false,
        };
        apply_like_toggle(&mut item);
        assert_eq!((item.likes, item.liked), (1, true));
        apply_like_toggle(&mut item);
        assert_eq!((item.likes, item.liked), (0, false));
    }
}
