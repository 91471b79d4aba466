//! Application Context
//!
//! Shared handles provided via Leptos Context API. The bus and the browser
//! collaborators are single-threaded, so they live in local stored values.

use leptos::prelude::*;

use crate::config::PlaybackConfig;
use crate::playback::{BusEvent, EventBus, FavoritesStore, SessionProvider};
use crate::storage::{LocalFavorites, LocalSession};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: StoredValue<PlaybackConfig>,
    pub bus: StoredValue<EventBus, LocalStorage>,
    pub favorites: StoredValue<LocalFavorites, LocalStorage>,
    pub session: StoredValue<LocalSession, LocalStorage>,
    /// Bumped on every favorites-changed event - read
    pub favorites_version: ReadSignal<u32>,
    set_favorites_version: WriteSignal<u32>,
    /// Bumped on sign-in/out - read
    pub session_version: ReadSignal<u32>,
    set_session_version: WriteSignal<u32>,
    /// Login prompt visibility - read
    pub login_open: ReadSignal<bool>,
    set_login_open: WriteSignal<bool>,
}

impl AppContext {
    pub fn new(config: PlaybackConfig) -> Self {
        let (favorites_version, set_favorites_version) = signal(0u32);
        let (session_version, set_session_version) = signal(0u32);
        let (login_open, set_login_open) = signal(false);
        Self {
            config: StoredValue::new(config),
            bus: StoredValue::new_local(EventBus::new()),
            favorites: StoredValue::new_local(LocalFavorites::browser()),
            session: StoredValue::new_local(LocalSession::browser()),
            favorites_version,
            set_favorites_version,
            session_version,
            set_session_version,
            login_open,
            set_login_open,
        }
    }

    pub fn config(&self) -> PlaybackConfig {
        self.config.get_value()
    }

    pub fn publish(&self, event: BusEvent) {
        self.bus.with_value(|bus| {
            bus.publish(event);
        });
    }

    /// Favorites badge count; tracks `favorites_version`
    pub fn favorites_count(&self) -> usize {
        self.favorites_version.track();
        self.favorites.with_value(|f| f.count())
    }

    pub fn is_favorite(&self, title: &str, ingredients: &[String]) -> bool {
        self.favorites.with_value(|f| f.is_favorite(title, ingredients))
    }

    pub fn notify_favorites_changed(&self) {
        self.set_favorites_version.update(|v| *v += 1);
    }

    pub fn user_name(&self) -> Option<String> {
        self.session_version.track();
        self.session.with_value(|s| s.current_user()).map(|u| u.name)
    }

    pub fn sign_in(&self, name: &str) -> Result<(), crate::error::ServiceError> {
        self.session.with_value(|s| s.sign_in(name))?;
        self.set_session_version.update(|v| *v += 1);
        self.close_login();
        Ok(())
    }

    pub fn sign_out(&self) {
        if let Err(e) = self.session.with_value(|s| s.sign_out()) {
            log::warn!("[SESSION] sign out failed: {}", e);
        }
        self.set_session_version.update(|v| *v += 1);
    }

    pub fn open_login(&self) {
        self.set_login_open.set(true);
    }

    pub fn close_login(&self) {
        self.set_login_open.set(false);
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
