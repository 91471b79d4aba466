//! Collaborator Interfaces
//!
//! Synchronous collaborators the card controller talks to. Browser-backed
//! implementations live in `crate::storage` and `crate::commands`.

use crate::error::ServiceError;
use crate::models::{FavoriteRecord, NewFavorite, Recipe, Storyboard, User};

pub trait SessionProvider {
    fn is_authenticated(&self) -> bool;
    fn current_user(&self) -> Option<User>;
}

pub trait FavoritesStore {
    fn list(&self) -> Vec<FavoriteRecord>;
    fn add(&self, favorite: NewFavorite) -> Result<FavoriteRecord, ServiceError>;
    fn remove(&self, id: &str) -> Result<(), ServiceError>;

    fn find(&self, title: &str, ingredients: &[String]) -> Option<FavoriteRecord> {
        self.list()
            .into_iter()
            .find(|record| same_recipe(record, title, ingredients))
    }

    fn is_favorite(&self, title: &str, ingredients: &[String]) -> bool {
        self.find(title, ingredients).is_some()
    }
}

/// Everything the assistant needs to talk about one recipe
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantContext {
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub storyboard: Option<Storyboard>,
}

pub trait AssistantLauncher {
    fn open(&self, context: AssistantContext);
}

/// A favorite is identified by its title and ingredient set, ignoring case
/// and order.
pub fn same_recipe(record: &FavoriteRecord, title: &str, ingredients: &[String]) -> bool {
    record.recipe.title.trim().eq_ignore_ascii_case(title.trim())
        && normalized(&record.ingredients) == normalized(ingredients)
}

fn normalized(ingredients: &[String]) -> Vec<String> {
    let mut list: Vec<String> = ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();
    list.sort();
    list.dedup();
    list
}

#[cfg(test)]
pub use memory::{MemoryFavorites, MemorySession, RecordingAssistant};

#[cfg(test)]
mod memory {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    pub struct MemorySession {
        pub user: RefCell<Option<User>>,
    }

    impl MemorySession {
        pub fn signed_in() -> Self {
            Self {
                user: RefCell::new(Some(User { id: "u1".into(), name: "Ada".into() })),
            }
        }
    }

    impl SessionProvider for MemorySession {
        fn is_authenticated(&self) -> bool {
            self.user.borrow().is_some()
        }

        fn current_user(&self) -> Option<User> {
            self.user.borrow().clone()
        }
    }

    #[derive(Default)]
    pub struct MemoryFavorites {
        records: RefCell<Vec<FavoriteRecord>>,
        next_id: Cell<u32>,
        pub fail_writes: Cell<bool>,
    }

    impl FavoritesStore for MemoryFavorites {
        fn list(&self) -> Vec<FavoriteRecord> {
            self.records.borrow().clone()
        }

        fn add(&self, favorite: NewFavorite) -> Result<FavoriteRecord, ServiceError> {
            if self.fail_writes.get() {
                return Err(ServiceError::Storage("quota".into()));
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let record = FavoriteRecord {
                id: format!("fav-{}", id),
                recipe: favorite.recipe,
                ingredients: favorite.ingredients,
                storyboard: favorite.storyboard,
                video_urls: favorite.video_urls,
                voiceover_url: favorite.voiceover_url,
                saved_at: f64::from(id),
            };
            self.records.borrow_mut().push(record.clone());
            Ok(record)
        }

        fn remove(&self, id: &str) -> Result<(), ServiceError> {
            if self.fail_writes.get() {
                return Err(ServiceError::Storage("quota".into()));
            }
            self.records.borrow_mut().retain(|r| r.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingAssistant {
        pub opened: RefCell<Vec<AssistantContext>>,
    }

    impl AssistantLauncher for RecordingAssistant {
        fn open(&self, context: AssistantContext) {
            self.opened.borrow_mut().push(context);
        }
    }
}
