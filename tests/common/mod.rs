use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use lenscoach::session::{SessionManager, SessionStore};
use lenscoach::storage::SqliteBackend;

#[allow(dead_code)]
pub fn create_temp_backend() -> (Arc<SqliteBackend>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("sessions.db");
    let backend =
        SqliteBackend::new_with_path(db_path).expect("failed to create sqlite backend with path");
    (Arc::new(backend), tmp)
}

#[allow(dead_code)]
pub fn create_temp_manager() -> (SessionManager, TempDir) {
    let (backend, tmp) = create_temp_backend();
    (SessionManager::new(SessionStore::new(backend)), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_image(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"not-really-a-jpeg").expect("failed to write image file");
    path
}
