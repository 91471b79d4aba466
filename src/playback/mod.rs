//! Playback Core
//!
//! Decides which card is visible and keeps exactly one narration playing.
//! No DOM types in here: media, frames and collaborators are traits, so the
//! whole core runs under plain `cargo test`.
//!
//! Flow: assembly builds cards -> the visibility tracker picks an index ->
//! that card's controller announces itself through the arbiter (everyone
//! else stops) -> its synchronizer starts from zero.

mod arbiter;
mod assembly;
mod bus;
mod card;
mod media;
mod sampler;
mod services;
mod sync;
mod visibility;


pub use arbiter::PlaybackArbiter;
pub use assembly::{assemble, Backdrop, CardCaption, CardOrigin, CardSource, RecipeCard};
pub use bus::{BusEvent, EventBus, Subscription, Topic};
pub use card::{CardController, CardMedia, CardStatus, FavoriteOutcome};
pub use media::{MediaElement, PlayRejection};
pub use sampler::{FrameSampler, FrameScheduler};
pub use services::{AssistantContext, AssistantLauncher, FavoritesStore, SessionProvider};
pub use sync::SyncPhase;
pub use visibility::VisibilityTracker;
