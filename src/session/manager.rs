//! Session lifecycle
//!
//! `SessionManager` ties the store, the quota check, and the clock together.
//! It keeps the current-session pointer valid and is the only place that
//! advances prompt counters.

use super::clock::{Clock, SystemClock};
use super::id::generate_session_title;
use super::rate_limit::{check_rate_limit_at, window_has_elapsed, RateLimitConfig, RateLimitStatus};
use super::store::SessionStore;
use super::types::{Message, Session, SessionMetadata};
use crate::error::{LensCoachError, Result};
use crate::providers::PromptClient;
use std::sync::Arc;

/// Result of submitting a prompt through [`SessionManager::submit_prompt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The backend answered and the exchange was persisted
    Answered {
        /// Session after the exchange was recorded
        session: Session,
        /// The model's reply
        reply: String,
    },
    /// The quota is exhausted; nothing was sent
    RateLimited(RateLimitStatus),
    /// The backend call failed; the persisted session is untouched
    Failed {
        /// Session as it was before the prompt
        session: Session,
        /// Readable failure description
        error: String,
    },
}

/// Creates, loads, switches, and deletes sessions and records exchanges
pub struct SessionManager {
    store: SessionStore,
    limits: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Creates a manager with default quota and the wall clock
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            limits: RateLimitConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Overrides the quota settings
    pub fn with_limits(mut self, limits: RateLimitConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Overrides the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Underlying store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Quota settings in effect
    pub fn limits(&self) -> &RateLimitConfig {
        &self.limits
    }

    /// Create, persist, and select a fresh empty session
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lenscoach::session::{SessionManager, SessionStore};
    /// use lenscoach::storage::MemoryBackend;
    ///
    /// let manager = SessionManager::new(SessionStore::new(Arc::new(MemoryBackend::new())));
    /// let session = manager.create_new_session(Some("Studio portraits")).unwrap();
    /// assert_eq!(manager.store().get_current_session_id(), Some(session.id));
    /// ```
    pub fn create_new_session(&self, title: Option<&str>) -> Result<Session> {
        let session = Session::new(title, self.clock.now());
        self.store.save_session(&session)?;
        self.store.set_current_session_id(&session.id)?;
        tracing::info!(session_id = %session.id, title = %session.title, "Created session");
        Ok(session)
    }

    /// The current session, creating one when the pointer is unset or dangling
    pub fn ensure_current_session(&self) -> Result<Session> {
        if let Some(id) = self.store.get_current_session_id() {
            if let Some(session) = self.store.get_session(&id) {
                return Ok(session);
            }
            tracing::warn!("Current session {} no longer exists, starting a new one", id);
        }

        self.create_new_session(None)
    }

    /// Quota status of `session` right now
    pub fn rate_limit_status(&self, session: &Session) -> RateLimitStatus {
        check_rate_limit_at(session, &self.limits, self.clock.now())
    }

    /// Append a successful prompt/reply pair and persist the session
    ///
    /// The first exchange also sets the title. A prompt arriving with no
    /// open window, or after the window ran out, starts a new window with a
    /// count of one.
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Storage` if the session cannot be saved
    pub fn record_exchange(
        &self,
        session: &Session,
        user_text: &str,
        images: &[String],
        ai_text: &str,
    ) -> Result<Session> {
        let now = self.clock.now();
        let mut updated = session.clone();

        if updated.messages.is_empty() {
            updated.title = generate_session_title(user_text, images.len());
        }

        updated
            .messages
            .push(Message::user(user_text, images.to_vec(), now));
        updated.messages.push(Message::ai(ai_text, now));

        if updated.prompt_count == 0 || window_has_elapsed(&updated, &self.limits, now) {
            updated.prompt_count = 1;
            updated.first_prompt_in_window = Some(now);
        } else {
            updated.prompt_count = updated.prompt_count.saturating_add(1);
        }
        updated.last_activity_at = now;

        self.store.save_session(&updated)?;
        tracing::debug!(
            session_id = %updated.id,
            prompt_count = updated.prompt_count,
            "Recorded exchange"
        );
        Ok(updated)
    }

    /// Check the quota, send the prompt, and record the exchange on success
    ///
    /// A rate-limited prompt is never sent. A failed call leaves the stored
    /// session exactly as it was and hands back the pre-prompt session.
    ///
    /// # Errors
    ///
    /// Returns an error only when a successful exchange cannot be persisted
    pub async fn submit_prompt(
        &self,
        session: &Session,
        text: &str,
        images: &[String],
        client: &dyn PromptClient,
    ) -> Result<PromptOutcome> {
        let status = self.rate_limit_status(session);
        if !status.allowed {
            tracing::info!(
                session_id = %session.id,
                reset_time = ?status.reset_time,
                "Prompt quota exhausted"
            );
            return Ok(PromptOutcome::RateLimited(status));
        }

        let response = client.send_prompt(text, images).await;
        match response.into_reply() {
            Ok(reply) => {
                let session = self.record_exchange(session, text, images, &reply)?;
                Ok(PromptOutcome::Answered { session, reply })
            }
            Err(error) => {
                tracing::warn!(session_id = %session.id, "Prompt failed: {}", error);
                Ok(PromptOutcome::Failed {
                    session: session.clone(),
                    error,
                })
            }
        }
    }

    /// Load a session and make it current
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::SessionNotFound` when the ID was evicted or deleted
    pub fn switch_session(&self, id: &str) -> Result<Session> {
        let session = self
            .store
            .get_session(id)
            .ok_or_else(|| LensCoachError::SessionNotFound(id.to_string()))?;

        self.store.set_current_session_id(&session.id)?;
        tracing::info!(session_id = %session.id, "Switched session");
        Ok(session)
    }

    /// Delete a session
    ///
    /// When the deleted session was current, a replacement is created and
    /// selected so that a current session always exists; it is returned.
    pub fn delete_session(&self, id: &str) -> Result<Option<Session>> {
        let was_current = self.store.get_current_session_id().as_deref() == Some(id);
        self.store.delete_session(id)?;

        if was_current {
            let replacement = self.create_new_session(None)?;
            return Ok(Some(replacement));
        }

        Ok(None)
    }

    /// Listing view, most recently active first
    pub fn list_sessions(&self) -> Vec<SessionMetadata> {
        self.store.get_all_sessions_metadata()
    }
}
