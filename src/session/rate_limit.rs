//! Sliding-window prompt quota
//!
//! Each session may accept a fixed number of prompts within a window that
//! opens with the first prompt. The check here is pure: it never mutates the
//! session. Whoever records an accepted prompt is responsible for opening a
//! new window (see [`window_has_elapsed`]) and bumping the counter.

use super::clock::now_millis;
use super::types::Session;
use chrono::{DateTime, Duration, Utc};

/// Prompts allowed per session within one window
pub const MAX_PROMPTS_PER_WINDOW: u32 = 15;

/// Window length in hours
pub const WINDOW_HOURS: u32 = 5;

/// Quota settings for the limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Prompts allowed per window
    pub max_prompts: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimitConfig {
    /// Creates limiter settings
    pub fn new(max_prompts: u32, window: Duration) -> Self {
        Self {
            max_prompts,
            window,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(
            MAX_PROMPTS_PER_WINDOW,
            Duration::hours(i64::from(WINDOW_HOURS)),
        )
    }
}

/// Outcome of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether another prompt may be sent
    pub allowed: bool,
    /// Prompts left in the current window
    pub remaining: u32,
    /// End of the exhausted window; only set when `allowed` is false and the
    /// end is representable
    pub reset_time: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    fn full(limits: &RateLimitConfig) -> Self {
        Self {
            allowed: true,
            remaining: limits.max_prompts,
            reset_time: None,
        }
    }
}

/// Check a session against the default quota at the current time
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use lenscoach::session::{check_rate_limit, Session};
///
/// let session = Session::new(None, Utc::now());
/// let status = check_rate_limit(&session);
/// assert!(status.allowed);
/// assert_eq!(status.remaining, 15);
/// ```
pub fn check_rate_limit(session: &Session) -> RateLimitStatus {
    check_rate_limit_at(session, &RateLimitConfig::default(), now_millis())
}

/// Check a session against explicit limits at an explicit time
pub fn check_rate_limit_at(
    session: &Session,
    limits: &RateLimitConfig,
    now: DateTime<Utc>,
) -> RateLimitStatus {
    let window_start = match session.first_prompt_in_window {
        Some(start) if session.prompt_count > 0 => start,
        _ => return RateLimitStatus::full(limits),
    };

    // An end past chrono's range never arrives.
    let window_end = window_start.checked_add_signed(limits.window);
    if window_end.is_some_and(|end| now >= end) {
        return RateLimitStatus::full(limits);
    }

    let remaining = limits.max_prompts.saturating_sub(session.prompt_count);
    if remaining == 0 {
        return RateLimitStatus {
            allowed: false,
            remaining: 0,
            reset_time: window_end,
        };
    }

    RateLimitStatus {
        allowed: true,
        remaining,
        reset_time: None,
    }
}

/// Whether the next accepted prompt opens a fresh window
///
/// True when no window was ever opened or the current one has run out.
pub fn window_has_elapsed(session: &Session, limits: &RateLimitConfig, now: DateTime<Utc>) -> bool {
    match session.first_prompt_in_window {
        Some(start) => start
            .checked_add_signed(limits.window)
            .is_some_and(|end| now >= end),
        None => true,
    }
}
