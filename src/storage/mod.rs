use crate::error::{LensCoachError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub mod memory;
pub use memory::MemoryBackend;

/// Environment variable that points the default backend at another database file
pub const SESSIONS_DB_ENV: &str = "LENSCOACH_SESSIONS_DB";

/// Local string key-value persistence
///
/// Session data lives under two keys: the serialized collection and the
/// current-session pointer. Every call is a complete read or write; there is
/// no transaction spanning calls.
pub trait KeyValueBackend: Send + Sync {
    /// Read a value, `None` when the key was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed key-value storage
pub struct SqliteBackend {
    db_path: PathBuf,
}

impl SqliteBackend {
    /// Create a backend in the user's data directory
    ///
    /// Honors `LENSCOACH_SESSIONS_DB` when set.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var(SESSIONS_DB_ENV) {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "lenscoach", "lenscoach").ok_or_else(|| {
            LensCoachError::Storage("Could not determine data directory".into())
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;

        let backend = Self {
            db_path: data_dir.join("sessions.db"),
        };
        backend.init()?;

        Ok(backend)
    }

    /// Create a backend that uses the specified database path
    ///
    /// Parent directories are created as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lenscoach::storage::{KeyValueBackend, SqliteBackend};
    ///
    /// let dir = std::env::temp_dir().join("lenscoach-doc");
    /// let backend = SqliteBackend::new_with_path(dir.join("sessions.db")).unwrap();
    /// backend.set("greeting", "hello").unwrap();
    /// assert_eq!(backend.get("greeting").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;
        }

        let backend = Self { db_path };
        backend.init()?;
        Ok(backend)
    }

    /// Location of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;
        Ok(conn)
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;

        Ok(())
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.open()?;

        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .context("Failed to read key")
            .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;

        tracing::debug!(key, found = value.is_some(), "storage read");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .context("Failed to write key")
        .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;

        tracing::debug!(key, bytes = value.len(), "storage write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.open()?;

        conn.execute("DELETE FROM kv WHERE key = ?", params![key])
            .context("Failed to remove key")
            .map_err(|e| LensCoachError::Storage(format!("{:#}", e)))?;

        tracing::debug!(key, "storage remove");
        Ok(())
    }
}
