//! Card Controller
//!
//! Owns one card's local state and its media. Joins the arbiter on
//! construction so other cards' announcements stop it; leaves on drop.

use std::cell::RefCell;
use std::rc::Rc;

use super::arbiter::PlaybackArbiter;
use super::assembly::RecipeCard;
use super::bus::{BusEvent, EventBus, Subscription};
use super::media::{MediaElement, PlayRejection};
use super::services::{AssistantContext, AssistantLauncher, FavoritesStore, SessionProvider};
use super::sync::{DriftCorrection, MediaSynchronizer, SyncPhase, SyncTuning};
use crate::config::PlaybackConfig;
use crate::error::ServiceError;
use crate::models::NewFavorite;

/// Snapshot of a card's UI-visible state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardStatus {
    pub muted: bool,
    /// Narration is playing
    pub playing: bool,
    pub details_open: bool,
    pub favorited: bool,
    /// None for cards without narration
    pub phase: Option<SyncPhase>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteOutcome {
    Added,
    Removed,
    /// Not signed in; a login prompt was requested and nothing changed
    LoginRequired,
    Failed(ServiceError),
}

/// Media elements owned by one card
pub struct CardMedia<M> {
    pub audio: M,
    pub video: Option<M>,
}

type StatusObserver = Rc<dyn Fn(CardStatus)>;

struct CardInner<M: MediaElement> {
    status: CardStatus,
    sync: Option<MediaSynchronizer<M>>,
    observer: Option<StatusObserver>,
}

impl<M: MediaElement> CardInner<M> {
    fn refresh(&mut self) -> (CardStatus, Option<StatusObserver>) {
        if let Some(sync) = &self.sync {
            self.status.phase = Some(sync.phase());
            self.status.playing = !sync.audio().is_paused();
        }
        (self.status, self.observer.clone())
    }

    fn stop(&mut self) -> bool {
        let changed = self.sync.as_mut().map(|s| s.deactivate()).unwrap_or(false);
        self.status.playing = false;
        changed
    }
}

pub struct CardController<M: MediaElement + 'static> {
    index: usize,
    card: RecipeCard,
    inner: Rc<RefCell<CardInner<M>>>,
    arbiter: PlaybackArbiter,
    narration_volume: f64,
    _membership: Subscription,
}

impl<M: MediaElement + 'static> CardController<M> {
    /// `media` is ignored for cards without narration
    pub fn new(
        index: usize,
        card: RecipeCard,
        media: Option<CardMedia<M>>,
        bus: &EventBus,
        config: &PlaybackConfig,
    ) -> Self {
        let sync = match (card.narration.as_deref(), media) {
            (Some(url), Some(media)) => {
                media.audio.set_volume(config.narration_volume);
                let sync = MediaSynchronizer::new(media.audio, media.video, url, SyncTuning::from(config));
                Some(if card.video_urls().len() > 1 { sync.clip_sequence() } else { sync })
            }
            _ => None,
        };
        let status = CardStatus {
            favorited: card.is_favorited,
            phase: sync.as_ref().map(|s| s.phase()),
            ..Default::default()
        };
        let inner = Rc::new(RefCell::new(CardInner { status, sync, observer: None }));

        let arbiter = PlaybackArbiter::new(bus.clone());
        let weak = Rc::downgrade(&inner);
        let membership = arbiter.join(index, move || {
            let Some(inner) = weak.upgrade() else { return };
            let Ok(mut guard) = inner.try_borrow_mut() else {
                log::warn!("[CARD {}] stop arrived while busy", index);
                return;
            };
            if guard.stop() {
                log::debug!("[CARD {}] stopped by another card", index);
            }
            let (status, observer) = guard.refresh();
            drop(guard);
            if let Some(observer) = observer {
                observer(status);
            }
        });

        Self {
            index,
            card,
            inner,
            arbiter,
            narration_volume: config.narration_volume,
            _membership: membership,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn card(&self) -> &RecipeCard {
        &self.card
    }

    pub fn status(&self) -> CardStatus {
        self.inner.borrow().status
    }

    /// Called with the new status after every change, including stops
    /// triggered by other cards
    pub fn set_observer<F>(&self, observer: F)
    where
        F: Fn(CardStatus) + 'static,
    {
        self.inner.borrow_mut().observer = Some(Rc::new(observer));
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut CardInner<M>) -> R) -> R {
        let mut guard = self.inner.borrow_mut();
        let out = f(&mut guard);
        let (status, observer) = guard.refresh();
        drop(guard);
        if let Some(observer) = observer {
            observer(status);
        }
        out
    }

    /// This card is now the visible one: stop everyone else, then start
    pub fn activate(&self, now_ms: f64) -> Option<SyncPhase> {
        self.arbiter.announce(self.index);
        self.with_inner(|inner| inner.sync.as_mut().map(|s| s.activate(now_ms)))
    }

    /// Stop this card directly (list teardown)
    pub fn deactivate(&self) -> bool {
        self.with_inner(|inner| inner.stop())
    }

    pub fn on_data_ready(&self, now_ms: f64) {
        self.with_inner(|inner| {
            if let Some(sync) = inner.sync.as_mut() {
                sync.on_data_ready(now_ms);
            }
        });
    }

    pub fn on_play_rejected(&self, rejection: &PlayRejection) {
        self.with_inner(|inner| {
            if let Some(sync) = inner.sync.as_mut() {
                sync.on_play_rejected(rejection);
            }
        });
    }

    pub fn on_video_time(&self, video_time: f64) -> bool {
        self.with_inner(|inner| inner.sync.as_mut().map(|s| s.on_video_time(video_time)).unwrap_or(false))
    }

    pub fn on_drift_tick(&self, now_ms: f64) -> Option<DriftCorrection> {
        let mut guard = self.inner.borrow_mut();
        guard.sync.as_mut()?.on_drift_tick(now_ms)
    }

    /// Volume only; never pauses
    pub fn toggle_mute(&self) -> bool {
        let volume = self.narration_volume;
        self.with_inner(|inner| {
            inner.status.muted = !inner.status.muted;
            if let Some(sync) = &inner.sync {
                sync.set_volume(if inner.status.muted { 0.0 } else { volume });
            }
            inner.status.muted
        })
    }

    /// Manual play/pause of the narration. The next activation or stop
    /// overrides it. Does nothing on a card that is not active.
    pub fn toggle_play(&self, now_ms: f64) -> bool {
        self.with_inner(|inner| match inner.sync.as_mut() {
            Some(sync) => sync.user_toggle(now_ms),
            None => false,
        })
    }

    pub fn toggle_details(&self) -> bool {
        self.with_inner(|inner| {
            inner.status.details_open = !inner.status.details_open;
            inner.status.details_open
        })
    }

    /// Save or unsave the recipe. Requires a session; without one a login
    /// prompt is requested on the bus instead.
    pub fn toggle_favorite(
        &mut self,
        session: &dyn SessionProvider,
        store: &dyn FavoritesStore,
    ) -> FavoriteOutcome {
        let bus = self.arbiter.bus().clone();
        if !session.is_authenticated() {
            bus.publish(BusEvent::LoginRequired);
            return FavoriteOutcome::LoginRequired;
        }

        let result = if self.card.is_favorited {
            match store.find(&self.card.recipe.title, &self.card.ingredients) {
                Some(record) => store.remove(&record.id).map(|_| FavoriteOutcome::Removed),
                None => Ok(FavoriteOutcome::Removed),
            }
        } else {
            store
                .add(NewFavorite {
                    recipe: self.card.recipe.clone(),
                    ingredients: self.card.ingredients.clone(),
                    storyboard: self.card.storyboard.clone(),
                    video_urls: self.card.video_urls().to_vec(),
                    voiceover_url: self.card.narration.clone(),
                })
                .map(|_| FavoriteOutcome::Added)
        };

        match result {
            Ok(outcome) => {
                self.card.is_favorited = outcome == FavoriteOutcome::Added;
                let favorited = self.card.is_favorited;
                self.with_inner(|inner| inner.status.favorited = favorited);
                bus.publish(BusEvent::FavoritesChanged);
                outcome
            }
            Err(e) => {
                log::warn!("[CARD {}] favorite update failed: {}", self.index, e);
                FavoriteOutcome::Failed(e)
            }
        }
    }

    pub fn open_assistant(&self, launcher: &dyn AssistantLauncher) {
        launcher.open(AssistantContext {
            recipe: self.card.recipe.clone(),
            ingredients: self.card.ingredients.clone(),
            storyboard: self.card.storyboard.clone(),
        });
    }

    /// Terminal: stop media for good. Also runs on drop.
    pub fn unmount(&self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            if let Some(sync) = inner.sync.as_mut() {
                sync.unmount();
            }
            inner.status.playing = false;
        }
    }
}

impl<M: MediaElement + 'static> Drop for CardController<M> {
    fn drop(&mut self) {
        self.unmount();
    }
}
