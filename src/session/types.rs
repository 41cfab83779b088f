use super::id::{generate_id, DEFAULT_SESSION_TITLE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A prompt typed by the user
    User,
    /// A reply from the coaching model
    Ai,
}

/// A single entry in a session transcript
///
/// Messages are immutable once appended and are owned by their session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier
    pub id: String,
    /// Author of the message
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// When the message was appended
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Prompt text or markdown reply
    pub text: String,
    /// Opaque image references attached to a user prompt
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// UI hint for replies with collapsible details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
}

impl Message {
    /// Creates a user prompt message with a fresh ID
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use lenscoach::session::{Message, MessageKind};
    ///
    /// let msg = Message::user("Settings for a night market?", vec![], Utc::now());
    /// assert_eq!(msg.kind, MessageKind::User);
    /// ```
    pub fn user(text: impl Into<String>, images: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            kind: MessageKind::User,
            timestamp,
            text: text.into(),
            images,
            is_expanded: None,
        }
    }

    /// Creates a model reply message with a fresh ID
    pub fn ai(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            kind: MessageKind::Ai,
            timestamp,
            text: text.into(),
            images: Vec::new(),
            is_expanded: None,
        }
    }
}

/// A bounded conversation thread with its own quota counters
///
/// `last_activity_at` is the only ordering key used for eviction and for
/// "most recent first" listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Label shown in listings
    pub title: String,
    /// Creation time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Time of the last appended message (or creation)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity_at: DateTime<Utc>,
    /// Transcript in append order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Prompts accepted since `first_prompt_in_window`
    #[serde(default)]
    pub prompt_count: u32,
    /// Start of the current rate window
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_prompt_in_window: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates an empty session with fresh ID and zeroed counters
    ///
    /// # Arguments
    ///
    /// * `title` - Optional label; `DEFAULT_SESSION_TITLE` when `None` or blank
    /// * `now` - Used for both `created_at` and `last_activity_at`
    pub fn new(title: Option<&str>, now: DateTime<Utc>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SESSION_TITLE);

        Self {
            id: generate_id(),
            title: title.to_string(),
            created_at: now,
            last_activity_at: now,
            messages: Vec::new(),
            prompt_count: 0,
            first_prompt_in_window: None,
        }
    }

    /// Lightweight projection for listings
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
            message_count: self.messages.len(),
            prompt_count: self.prompt_count,
        }
    }
}

/// Read-only listing view of a session, derived on demand and never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Session identifier
    pub id: String,
    /// Session label
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of last activity
    pub last_activity_at: DateTime<Utc>,
    /// Number of messages in the transcript
    pub message_count: usize,
    /// Prompts in the current window
    pub prompt_count: u32,
}
