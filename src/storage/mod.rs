//! Browser Storage
//!
//! `localStorage`-backed favorites and session. Both sit on a small
//! key/value seam so they run against a map in tests.

mod favorites;
mod session;

pub use favorites::LocalFavorites;
pub use session::LocalSession;

use crate::error::ServiceError;

pub const FAVORITES_KEY: &str = "recipe-reels.favorites";
pub const SESSION_KEY: &str = "recipe-reels.session";

pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;
    fn delete(&self, key: &str) -> Result<(), ServiceError>;
}

/// `window.localStorage`
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, ServiceError> {
        web_sys::window()
            .ok_or_else(|| ServiceError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| ServiceError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ServiceError::Storage("localStorage unavailable".into()))
    }
}

impl KeyValue for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| ServiceError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| ServiceError::Storage(format!("{:?}", e)))
    }

    fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| ServiceError::Storage(format!("{:?}", e)))
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryKv;

#[cfg(test)]
mod memory {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryKv {
        pub entries: RefCell<HashMap<String, String>>,
    }

    impl KeyValue for MemoryKv {
        fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
            self.entries.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), ServiceError> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }
}
