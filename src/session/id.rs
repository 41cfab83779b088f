use ulid::Ulid;

/// Title given to sessions before their first exchange
pub const DEFAULT_SESSION_TITLE: &str = "New Session";

const TITLE_PREVIEW_CHARS: usize = 30;

/// Generate a unique identifier for sessions and messages
///
/// IDs are ULIDs: a millisecond timestamp prefix followed by random bits,
/// so they also sort by creation time.
///
/// # Examples
///
/// ```
/// use lenscoach::session::generate_id;
///
/// let a = generate_id();
/// let b = generate_id();
/// assert_eq!(a.len(), 26);
/// assert_ne!(a, b);
/// ```
pub fn generate_id() -> String {
    Ulid::new().to_string()
}

/// Build a session label from the first prompt
///
/// The first 30 characters of `text` followed by `...`, prefixed with an
/// image marker when images were attached. Falls back to the marker alone,
/// then to [`DEFAULT_SESSION_TITLE`].
///
/// # Examples
///
/// ```
/// use lenscoach::session::generate_session_title;
///
/// assert_eq!(generate_session_title("Golden hour", 0), "Golden hour...");
/// assert_eq!(generate_session_title("", 1), "📷 1 image");
/// assert_eq!(generate_session_title("Dusk", 2), "📷 2 images - Dusk...");
/// ```
pub fn generate_session_title(text: &str, image_count: usize) -> String {
    let preview: String = text.chars().take(TITLE_PREVIEW_CHARS).collect();
    let image_marker = match image_count {
        0 => None,
        1 => Some("📷 1 image".to_string()),
        n => Some(format!("📷 {} images", n)),
    };

    if !preview.trim().is_empty() {
        return match image_marker {
            Some(marker) => format!("{} - {}...", marker, preview),
            None => format!("{}...", preview),
        };
    }

    image_marker.unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string())
}
