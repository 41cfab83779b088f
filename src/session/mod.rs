//! Session history and prompt quota
//!
//! This module owns everything about conversation threads on the client:
//!
//! - `types`: `Session`, `Message`, and the `SessionMetadata` listing view
//! - `id`: ID and title generation
//! - `clock`: injectable time source
//! - `rate_limit`: the pure sliding-window quota check
//! - `store`: persisted collection with capacity eviction and the current-session pointer
//! - `manager`: lifecycle operations (create, switch, delete, record exchanges)

pub mod clock;
pub mod id;
pub mod manager;
pub mod rate_limit;
pub mod store;
pub mod types;

pub use clock::{now_millis, Clock, ManualClock, SystemClock};
pub use id::{generate_id, generate_session_title, DEFAULT_SESSION_TITLE};
pub use manager::{PromptOutcome, SessionManager};
pub use rate_limit::{
    check_rate_limit, check_rate_limit_at, window_has_elapsed, RateLimitConfig, RateLimitStatus,
    MAX_PROMPTS_PER_WINDOW, WINDOW_HOURS,
};
pub use store::{SessionStore, CURRENT_SESSION_KEY, MAX_SESSIONS, SESSIONS_KEY};
pub use types::{Message, MessageKind, Session, SessionMetadata};
