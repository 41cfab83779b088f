//! Error types for LensCoach
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for LensCoach operations
///
/// Covers configuration loading, local session storage, lookups of
/// sessions that no longer exist, and calls to the coaching backend.
#[derive(Error, Debug)]
pub enum LensCoachError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage errors (database or (de)serialization of the collection)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A session ID did not resolve, usually because it was evicted or deleted
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Coaching backend errors (transport, unexpected payloads)
    #[error("Provider error: {0}")]
    Provider(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for LensCoach operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to `downcast_ref::<LensCoachError>()` for the typed cases.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = LensCoachError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = LensCoachError::Storage("database connection failed".to_string());
        assert_eq!(
            error.to_string(),
            "Storage error: database connection failed"
        );
    }

    #[test]
    fn test_session_not_found_display() {
        let error = LensCoachError::SessionNotFound("01HZX".to_string());
        assert_eq!(error.to_string(), "Session not found: 01HZX");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LensCoachError = io_error.into();
        assert!(matches!(error, LensCoachError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: LensCoachError = json_error.into();
        assert!(matches!(error, LensCoachError::Serialization(_)));
    }

    #[test]
    fn test_typed_error_survives_anyhow() {
        let result: Result<()> = Err(LensCoachError::SessionNotFound("abc".to_string()).into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LensCoachError>(),
            Some(LensCoachError::SessionNotFound(id)) if id == "abc"
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LensCoachError>();
    }
}
