//! Error Types
//!
//! Nothing here is fatal to the app: playback errors leave a card silent,
//! service errors leave a recipe without media.

use thiserror::Error;

/// Media element failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The platform rejected a programmatic play request (autoplay policy)
    #[error("playback blocked: {0}")]
    Blocked(String),

    #[error("no media source attached")]
    NoSource,

    /// The element is not mounted
    #[error("media element detached")]
    ElementDetached,
}

/// Collaborator failures (host bridge, browser storage, session)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("bridge call failed: {0}")]
    Bridge(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("generation quota exceeded")]
    QuotaExceeded,

    #[error("not signed in")]
    NotAuthenticated,
}

impl From<serde_wasm_bindgen::Error> for ServiceError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlaybackError::Blocked("NotAllowedError".to_string());
        assert!(err.to_string().contains("NotAllowedError"));
        assert_eq!(ServiceError::QuotaExceeded.to_string(), "generation quota exceeded");
    }

    #[test]
    fn json_errors_become_decode() {
        let err: ServiceError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
