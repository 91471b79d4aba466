//! UI Components
//!
//! Leptos components for the capture flow and the reel feeds.

mod capture_form;
mod detail_panel;
mod favorites_view;
mod feed_view;
mod generation_loader;
mod login_prompt;
mod nav_bar;
mod plan_view;
mod quota_banner;
mod recipe_card;
mod recipe_feed;

pub use capture_form::CaptureForm;
pub use detail_panel::DetailPanel;
pub use favorites_view::FavoritesView;
pub use feed_view::FeedView;
pub use generation_loader::GenerationLoader;
pub use login_prompt::LoginPrompt;
pub use nav_bar::NavBar;
pub use plan_view::PlanView;
pub use quota_banner::QuotaBanner;
pub use recipe_card::ReelCard;
pub use recipe_feed::{LikeControls, RecipeFeed};
