//! Test utilities for LensCoach
//!
//! Shared builders for in-memory stores and managers, a controllable clock,
//! and assertion helpers.

use crate::error::Result;
use crate::session::{ManualClock, SessionManager, SessionStore};
use crate::storage::MemoryBackend;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

/// Session store over a fresh in-memory backend
pub fn memory_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryBackend::new()))
}

/// Session manager over a fresh in-memory backend and the wall clock
pub fn memory_manager() -> SessionManager {
    SessionManager::new(memory_store())
}

/// Session manager driven by a manual clock frozen at 2025-06-01 08:00 UTC
///
/// The clock is returned so tests can move time forward.
pub fn manager_with_clock() -> (SessionManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
    ));
    let manager = SessionManager::new(memory_store()).with_clock(clock.clone());
    (manager, clock)
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration YAML exercising every section
pub fn test_config_yaml() -> String {
    r#"
backend:
  base_url: http://127.0.0.1:8080/api
  timeout_seconds: 10
  max_images: 2
sessions:
  max_sessions: 3
  max_prompts_per_window: 4
  window_hours: 1
"#
    .to_string()
}
