use super::{BrowserStorage, KeyValue, SESSION_KEY};
use crate::error::ServiceError;
use crate::models::User;
use crate::playback::SessionProvider;

/// Local sign-in: the user record lives in storage until sign-out
pub struct LocalSession<S: KeyValue = BrowserStorage> {
    storage: S,
}

impl LocalSession<BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }
}

impl<S: KeyValue> LocalSession<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn sign_in(&self, name: &str) -> Result<User, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::NotAuthenticated);
        }
        let user = User {
            id: format!("local-{}", name.to_lowercase().replace(char::is_whitespace, "-")),
            name: name.to_string(),
        };
        self.storage.set(SESSION_KEY, &serde_json::to_string(&user)?)?;
        log::info!("[SESSION] signed in as {}", user.name);
        Ok(user)
    }

    pub fn sign_out(&self) -> Result<(), ServiceError> {
        self.storage.delete(SESSION_KEY)?;
        log::info!("[SESSION] signed out");
        Ok(())
    }
}

impl<S: KeyValue> SessionProvider for LocalSession<S> {
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn current_user(&self) -> Option<User> {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("[SESSION] storage unavailable: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("[SESSION] dropping unreadable session: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;

    #[test]
    fn sign_in_then_out() {
        let session = LocalSession::new(MemoryKv::default());
        assert!(!session.is_authenticated());

        let user = session.sign_in("  Grace Hopper ").unwrap();
        assert_eq!(user.name, "Grace Hopper");
        assert_eq!(user.id, "local-grace-hopper");
        assert_eq!(session.current_user(), Some(user));

        session.sign_out().unwrap();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let session = LocalSession::new(MemoryKv::default());
        assert_eq!(session.sign_in("   "), Err(ServiceError::NotAuthenticated));
        assert!(!session.is_authenticated());
    }
}
