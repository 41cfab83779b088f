//! LensCoach - AI photography coach client library
//!
//! A thin client that sends photos and prompts to a coaching backend and
//! keeps a small, bounded history of sessions on the local machine.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: session model, sliding-window prompt quota, bounded store, lifecycle manager
//! - `storage`: local key-value persistence (SQLite or in-memory)
//! - `providers`: the prompt client trait and the HTTP backend client
//! - `settings_parser`: best-effort extraction of camera settings from replies
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line interface
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lenscoach::session::{check_rate_limit, SessionManager, SessionStore};
//! use lenscoach::storage::MemoryBackend;
//!
//! # fn main() -> lenscoach::Result<()> {
//! let manager = SessionManager::new(SessionStore::new(Arc::new(MemoryBackend::new())));
//! let session = manager.ensure_current_session()?;
//! let session = manager.record_exchange(&session, "Foggy harbour at dawn", &[], "Try ISO 200")?;
//!
//! assert_eq!(session.prompt_count, 1);
//! assert_eq!(check_rate_limit(&session).remaining, 14);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod session;
pub mod settings_parser;
pub mod storage;
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{LensCoachError, Result};
pub use session::{Session, SessionManager, SessionStore};
