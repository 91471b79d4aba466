use std::cell::Cell;

use super::{BrowserStorage, KeyValue, FAVORITES_KEY};
use crate::error::ServiceError;
use crate::models::{FavoriteRecord, NewFavorite};
use crate::playback::FavoritesStore;

/// Favorites kept as one JSON array under `FAVORITES_KEY`
pub struct LocalFavorites<S: KeyValue = BrowserStorage> {
    storage: S,
    clock: fn() -> f64,
    /// Disambiguates ids minted within the same millisecond
    seq: Cell<u32>,
}

impl LocalFavorites<BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage, js_sys::Date::now)
    }
}

impl<S: KeyValue> LocalFavorites<S> {
    pub fn new(storage: S, clock: fn() -> f64) -> Self {
        Self { storage, clock, seq: Cell::new(0) }
    }

    fn load(&self) -> Result<Vec<FavoriteRecord>, ServiceError> {
        match self.storage.get(FAVORITES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[FavoriteRecord]) -> Result<(), ServiceError> {
        let raw = serde_json::to_string(records)?;
        self.storage.set(FAVORITES_KEY, &raw)
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }
}

impl<S: KeyValue> FavoritesStore for LocalFavorites<S> {
    fn list(&self) -> Vec<FavoriteRecord> {
        self.load().unwrap_or_else(|e| {
            log::warn!("[FAVORITES] unreadable store, treating as empty: {}", e);
            Vec::new()
        })
    }

    fn add(&self, favorite: NewFavorite) -> Result<FavoriteRecord, ServiceError> {
        let mut records = self.load()?;
        let saved_at = (self.clock)();
        let seq = self.seq.get();
        self.seq.set(seq.wrapping_add(1));
        let record = FavoriteRecord {
            id: format!("fav-{}-{}", saved_at as u64, seq),
            recipe: favorite.recipe,
            ingredients: favorite.ingredients,
            storyboard: favorite.storyboard,
            video_urls: favorite.video_urls,
            voiceover_url: favorite.voiceover_url,
            saved_at,
        };
        records.push(record.clone());
        self.save(&records)?;
        log::info!("[FAVORITES] saved {} ({})", record.recipe.title, record.id);
        Ok(record)
    }

    fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() != before {
            self.save(&records)?;
            log::info!("[FAVORITES] removed {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_recipe;
    use crate::storage::MemoryKv;

    fn store() -> LocalFavorites<MemoryKv> {
        LocalFavorites::new(MemoryKv::default(), || 1_700_000_000_000.0)
    }

    fn favorite(title: &str) -> NewFavorite {
        NewFavorite {
            recipe: sample_recipe(title),
            ingredients: vec!["leek".into(), "potato".into()],
            storyboard: None,
            video_urls: vec!["v.mp4".into()],
            voiceover_url: None,
        }
    }

    #[test]
    fn add_persists_and_mints_distinct_ids() {
        let favorites = store();
        let a = favorites.add(favorite("Leek Soup")).unwrap();
        let b = favorites.add(favorite("Gratin")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.saved_at, 1_700_000_000_000.0);

        let raw = favorites.storage.get(FAVORITES_KEY).unwrap().unwrap();
        let decoded: Vec<FavoriteRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(favorites.count(), 2);
    }

    #[test]
    fn remove_and_lookup() {
        let favorites = store();
        let saved = favorites.add(favorite("Leek Soup")).unwrap();
        let ingredients = vec!["Potato".to_string(), "leek".to_string()];
        assert!(favorites.is_favorite("leek soup", &ingredients));

        favorites.remove(&saved.id).unwrap();
        assert!(!favorites.is_favorite("leek soup", &ingredients));
        // unknown id is not an error
        favorites.remove("fav-missing").unwrap();
    }

    #[test]
    fn corrupt_store_lists_empty_but_refuses_writes() {
        let favorites = store();
        favorites.storage.set(FAVORITES_KEY, "{not json").unwrap();
        assert!(favorites.list().is_empty());
        assert!(matches!(favorites.add(favorite("X")), Err(ServiceError::Decode(_))));
    }
}
