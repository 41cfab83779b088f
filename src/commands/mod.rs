//! Command handlers for the LensCoach CLI
//!
//! Each handler takes an already-built [`SessionManager`] so the same code
//! runs against the on-disk store or an in-memory one.

pub mod ask;
pub mod history;
pub mod quota;

use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionManager, SessionStore};
use crate::storage::{KeyValueBackend, MemoryBackend, SqliteBackend};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use std::sync::Arc;

/// Build the session manager described by `config`
///
/// # Arguments
///
/// * `config` - Loaded and validated configuration
/// * `ephemeral` - Use an in-memory store instead of the sessions database
pub fn build_manager(config: &Config, ephemeral: bool) -> Result<SessionManager> {
    let backend: Arc<dyn KeyValueBackend> = if ephemeral {
        tracing::debug!("Using in-memory session storage");
        Arc::new(MemoryBackend::new())
    } else {
        match &config.storage.db_path {
            Some(path) => Arc::new(SqliteBackend::new_with_path(path.as_str())?),
            None => Arc::new(SqliteBackend::new()?),
        }
    };

    let store = SessionStore::new(backend).with_max_sessions(config.sessions.max_sessions);
    Ok(SessionManager::new(store).with_limits(config.sessions.rate_limit()))
}

/// Handle `lenscoach new`
pub fn run_new(manager: &SessionManager, title: Option<String>) -> Result<()> {
    let session = manager.create_new_session(title.as_deref())?;
    println!(
        "{}",
        format!("Started session {} ({})", session.id, session.title).green()
    );
    Ok(())
}

/// Local wall-clock rendering used across command output
pub(crate) fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
