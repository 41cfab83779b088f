//! Persisted session collection
//!
//! The whole collection is serialized as one JSON array under
//! [`SESSIONS_KEY`]; the current-session pointer is a bare ID under
//! [`CURRENT_SESSION_KEY`]. Writes are read-modify-write of the full
//! collection and assume a single writer.
//!
//! Read-only queries never fail: storage and deserialization errors are
//! logged and reported as "nothing stored". Mutations propagate errors.

use super::types::{Session, SessionMetadata};
use crate::error::{LensCoachError, Result};
use crate::storage::KeyValueBackend;
use std::sync::Arc;

/// Sessions retained before the least recently active ones are evicted
pub const MAX_SESSIONS: usize = 5;

/// Key holding the JSON array of sessions
pub const SESSIONS_KEY: &str = "@photography_coach_sessions";

/// Key holding the current session ID
pub const CURRENT_SESSION_KEY: &str = "@photography_coach_current_session";

/// Bounded store of sessions plus the current-session pointer
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueBackend>,
    max_sessions: usize,
}

impl SessionStore {
    /// Creates a store retaining at most [`MAX_SESSIONS`] sessions
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lenscoach::session::SessionStore;
    /// use lenscoach::storage::MemoryBackend;
    ///
    /// let store = SessionStore::new(Arc::new(MemoryBackend::new()));
    /// assert!(store.get_all_sessions_metadata().is_empty());
    /// assert!(store.get_current_session_id().is_none());
    /// ```
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            max_sessions: MAX_SESSIONS,
        }
    }

    /// Overrides the retention cap
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// The retention cap
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn load_sessions(&self) -> Result<Vec<Session>> {
        let Some(json) = self.backend.get(SESSIONS_KEY)? else {
            return Ok(Vec::new());
        };

        let sessions = serde_json::from_str(&json).map_err(|e| {
            LensCoachError::Storage(format!("Failed to deserialize sessions: {}", e))
        })?;
        Ok(sessions)
    }

    fn persist_sessions(&self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string(sessions)
            .map_err(|e| LensCoachError::Storage(format!("Failed to serialize sessions: {}", e)))?;
        self.backend.set(SESSIONS_KEY, &json)
    }

    /// Listing view of every stored session, most recently active first
    ///
    /// Returns an empty list when nothing is stored or the collection cannot be read.
    pub fn get_all_sessions_metadata(&self) -> Vec<SessionMetadata> {
        let sessions = match self.load_sessions() {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!("Error loading sessions metadata: {:#}", e);
                return Vec::new();
            }
        };

        let mut metadata: Vec<SessionMetadata> = sessions.iter().map(Session::metadata).collect();
        metadata.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        metadata
    }

    /// Full session by ID, `None` when absent or unreadable
    pub fn get_session(&self, id: &str) -> Option<Session> {
        match self.load_sessions() {
            Ok(sessions) => sessions.into_iter().find(|s| s.id == id),
            Err(e) => {
                tracing::error!("Error loading session {}: {:#}", id, e);
                None
            }
        }
    }

    /// Insert or replace a session by ID
    ///
    /// Inserting a new ID beyond the cap evicts the least recently active
    /// sessions; the session being saved is never one of them.
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Storage` if the collection cannot be read or written
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.load_sessions()?;

        match sessions.iter().position(|s| s.id == session.id) {
            Some(index) => sessions[index] = session.clone(),
            None => {
                sessions.push(session.clone());
                if sessions.len() > self.max_sessions {
                    let evicted = evict_least_recent(&mut sessions, &session.id, self.max_sessions);
                    tracing::info!(
                        evicted = ?evicted,
                        retained = sessions.len(),
                        "Evicted least recently active sessions"
                    );
                }
            }
        }

        self.persist_sessions(&sessions)?;
        tracing::debug!(session_id = %session.id, "Saved session");
        Ok(())
    }

    /// Remove a session, clearing the current pointer if it referenced it
    ///
    /// Unknown IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Storage` if the collection or pointer cannot be updated
    pub fn delete_session(&self, id: &str) -> Result<()> {
        let mut sessions = self.load_sessions()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);

        if sessions.len() != before {
            self.persist_sessions(&sessions)?;
            tracing::info!(session_id = %id, "Deleted session");
        }

        if self.backend.get(CURRENT_SESSION_KEY)?.as_deref() == Some(id) {
            self.backend.remove(CURRENT_SESSION_KEY)?;
        }

        Ok(())
    }

    /// ID the UI is currently showing, `None` when unset or unreadable
    pub fn get_current_session_id(&self) -> Option<String> {
        match self.backend.get(CURRENT_SESSION_KEY) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Error getting current session ID: {:#}", e);
                None
            }
        }
    }

    /// Point the current-session pointer at `id`
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Storage` if the pointer cannot be written
    pub fn set_current_session_id(&self, id: &str) -> Result<()> {
        self.backend.set(CURRENT_SESSION_KEY, id)
    }

    /// Wipe every session and the current pointer
    pub fn clear_all_sessions(&self) -> Result<()> {
        self.backend.remove(SESSIONS_KEY)?;
        self.backend.remove(CURRENT_SESSION_KEY)?;
        tracing::info!("Cleared all sessions");
        Ok(())
    }
}

/// Drop the oldest sessions by `last_activity_at` until `max` remain, skipping `keep_id`
///
/// Leaves `sessions` sorted oldest first and returns the evicted IDs.
fn evict_least_recent(sessions: &mut Vec<Session>, keep_id: &str, max: usize) -> Vec<String> {
    sessions.sort_by_key(|s| s.last_activity_at);

    let mut excess = sessions.len().saturating_sub(max);
    let mut evicted = Vec::new();
    sessions.retain(|s| {
        if excess > 0 && s.id != keep_id {
            excess -= 1;
            evicted.push(s.id.clone());
            false
        } else {
            true
        }
    });

    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Message;
    use crate::storage::MemoryBackend;
    use crate::test_utils::{assert_error_contains, memory_store};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Backend whose reads and/or writes always fail
    struct FailingBackend {
        fail_reads: bool,
        inner: MemoryBackend,
    }

    impl KeyValueBackend for FailingBackend {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(LensCoachError::Storage("disk unavailable".into()).into());
            }
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LensCoachError::Storage("disk full".into()).into())
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(LensCoachError::Storage("disk full".into()).into())
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn session_active_at(id: &str, minutes: i64) -> Session {
        let mut session = Session::new(Some(id), base());
        session.id = id.to_string();
        session.last_activity_at = base() + Duration::minutes(minutes);
        session
    }

    #[test]
    fn test_empty_store() {
        let store = memory_store();
        assert!(store.get_all_sessions_metadata().is_empty());
        assert!(store.get_session("missing").is_none());
        assert!(store.get_current_session_id().is_none());
    }

    #[test]
    fn test_save_then_get_roundtrip_is_deep_equal() {
        let store = memory_store();
        let mut session = session_active_at("a", 3);
        session.messages.push(Message::user(
            "Settings for a foggy pier?",
            vec!["file:///photos/pier.jpg".to_string()],
            base() + Duration::minutes(3),
        ));
        session.messages.push(Message::ai("Try ISO 400", base() + Duration::minutes(3)));
        session.prompt_count = 1;
        session.first_prompt_in_window = Some(base() + Duration::minutes(3));

        store.save_session(&session).unwrap();
        assert_eq!(store.get_session("a"), Some(session));
    }

    #[test]
    fn test_save_existing_id_replaces_in_place() {
        let store = memory_store();
        store.save_session(&session_active_at("a", 0)).unwrap();

        let mut updated = session_active_at("a", 10);
        updated.title = "Renamed".to_string();
        store.save_session(&updated).unwrap();

        let all = store.get_all_sessions_metadata();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed");
    }

    #[test]
    fn test_metadata_sorted_most_recent_first() {
        let store = memory_store();
        for (id, minutes) in [("b", 20), ("a", 5), ("c", 40), ("d", 1)] {
            store.save_session(&session_active_at(id, minutes)).unwrap();
        }

        let ids: Vec<String> = store
            .get_all_sessions_metadata()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_capacity_evicts_least_recently_active() {
        let store = memory_store();
        for (id, minutes) in [("a", 50), ("b", 10), ("c", 30), ("d", 40), ("e", 20)] {
            store.save_session(&session_active_at(id, minutes)).unwrap();
        }

        store.save_session(&session_active_at("f", 60)).unwrap();

        let all = store.get_all_sessions_metadata();
        assert_eq!(all.len(), MAX_SESSIONS);
        assert!(store.get_session("b").is_none());
        for id in ["a", "c", "d", "e", "f"] {
            assert!(store.get_session(id).is_some(), "{} should be retained", id);
        }
    }

    #[test]
    fn test_new_session_never_evicted_by_its_own_insertion() {
        let store = memory_store();
        for (id, minutes) in [("a", 10), ("b", 20), ("c", 30), ("d", 40), ("e", 50)] {
            store.save_session(&session_active_at(id, minutes)).unwrap();
        }

        // Older than everything already stored.
        store.save_session(&session_active_at("stale", 0)).unwrap();

        assert!(store.get_session("stale").is_some());
        assert!(store.get_session("a").is_none());
        assert_eq!(store.get_all_sessions_metadata().len(), MAX_SESSIONS);
    }

    #[test]
    fn test_updates_never_evict() {
        let store = memory_store().with_max_sessions(2);
        store.save_session(&session_active_at("a", 1)).unwrap();
        store.save_session(&session_active_at("b", 2)).unwrap();
        store.save_session(&session_active_at("a", 3)).unwrap();
        store.save_session(&session_active_at("b", 4)).unwrap();
        assert_eq!(store.get_all_sessions_metadata().len(), 2);
    }

    #[test]
    fn test_collection_never_exceeds_cap() {
        let store = memory_store();
        for i in 0..25 {
            // Alternate between fresh and stale activity times.
            let minutes = if i % 2 == 0 { i } else { -i };
            store
                .save_session(&session_active_at(&format!("s{}", i), minutes))
                .unwrap();
            assert!(store.get_all_sessions_metadata().len() <= MAX_SESSIONS);
            assert!(store.get_session(&format!("s{}", i)).is_some());
        }
    }

    #[test]
    fn test_evict_least_recent_reports_ids() {
        let mut sessions = vec![
            session_active_at("new", 0),
            session_active_at("x", 5),
            session_active_at("y", 1),
            session_active_at("z", 9),
        ];
        let evicted = evict_least_recent(&mut sessions, "new", 2);
        assert_eq!(evicted, vec!["y".to_string(), "x".to_string()]);
        let kept: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(kept, vec!["new", "z"]);
    }

    #[test]
    fn test_delete_current_clears_pointer() {
        let store = memory_store();
        store.save_session(&session_active_at("a", 0)).unwrap();
        store.set_current_session_id("a").unwrap();

        store.delete_session("a").unwrap();
        assert!(store.get_session("a").is_none());
        assert!(store.get_current_session_id().is_none());
    }

    #[test]
    fn test_delete_other_keeps_pointer() {
        let store = memory_store();
        store.save_session(&session_active_at("a", 0)).unwrap();
        store.save_session(&session_active_at("b", 1)).unwrap();
        store.set_current_session_id("a").unwrap();

        store.delete_session("b").unwrap();
        assert_eq!(store.get_current_session_id().as_deref(), Some("a"));
        assert_eq!(store.get_all_sessions_metadata().len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let store = memory_store();
        store.save_session(&session_active_at("a", 0)).unwrap();
        store.delete_session("nope").unwrap();
        assert_eq!(store.get_all_sessions_metadata().len(), 1);
    }

    #[test]
    fn test_clear_all_sessions() {
        let store = memory_store();
        store.save_session(&session_active_at("a", 0)).unwrap();
        store.set_current_session_id("a").unwrap();

        store.clear_all_sessions().unwrap();
        assert!(store.get_all_sessions_metadata().is_empty());
        assert!(store.get_current_session_id().is_none());
    }

    #[test]
    fn test_read_failures_degrade_to_empty() {
        let store = SessionStore::new(Arc::new(FailingBackend {
            fail_reads: true,
            inner: MemoryBackend::new(),
        }));

        assert!(store.get_all_sessions_metadata().is_empty());
        assert!(store.get_session("a").is_none());
        assert!(store.get_current_session_id().is_none());
    }

    #[test]
    fn test_write_failures_propagate() {
        let store = SessionStore::new(Arc::new(FailingBackend {
            fail_reads: false,
            inner: MemoryBackend::new(),
        }));

        assert!(store.save_session(&session_active_at("a", 0)).is_err());
        assert!(store.set_current_session_id("a").is_err());
        assert!(store.clear_all_sessions().is_err());
    }

    #[test]
    fn test_corrupt_collection_reads_empty_but_blocks_writes() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(SESSIONS_KEY, "{not json").unwrap();
        let store = SessionStore::new(backend);

        assert!(store.get_all_sessions_metadata().is_empty());
        assert!(store.get_session("a").is_none());

        let err = store.save_session(&session_active_at("a", 0)).unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize sessions"));

        store.clear_all_sessions().unwrap();
        store.save_session(&session_active_at("a", 0)).unwrap();
        assert!(store.get_session("a").is_some());
    }

    #[test]
    fn test_failed_write_leaves_corrupt_collection_untouched() {
        const CORRUPT: &str = r#"[{"id":"a","title":"half written"#;
        let backend = Arc::new(MemoryBackend::new());
        backend.set(SESSIONS_KEY, CORRUPT).unwrap();
        backend.set(CURRENT_SESSION_KEY, "a").unwrap();
        let store = SessionStore::new(backend.clone()).with_max_sessions(1);

        for id in ["b", "c"] {
            assert_error_contains(
                store.save_session(&session_active_at(id, 5)),
                "Failed to deserialize sessions",
            );
        }
        assert_error_contains(store.delete_session("a"), "Failed to deserialize sessions");

        assert_eq!(backend.get(SESSIONS_KEY).unwrap().as_deref(), Some(CORRUPT));
        assert_eq!(backend.get(CURRENT_SESSION_KEY).unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_reads_records_written_by_older_clients() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set(
                SESSIONS_KEY,
                r#"[{"id":"1717232400000_k3j2h1g9f","title":"📷 1 image - Sunset...","createdAt":1717232400000,"lastActivityAt":1717232460000,"messages":[{"id":"m1","type":"user","timestamp":1717232460000,"text":"Sunset","images":["file:///a.jpg"]},{"id":"m2","type":"ai","timestamp":1717232460000,"text":"Use f/8","isExpanded":false}],"promptCount":1,"firstPromptInWindow":1717232460000}]"#,
            )
            .unwrap();
        let store = SessionStore::new(backend);

        let session = store.get_session("1717232400000_k3j2h1g9f").unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].images, vec!["file:///a.jpg".to_string()]);
        assert_eq!(session.messages[1].is_expanded, Some(false));
        assert_eq!(session.prompt_count, 1);
    }
}
