use super::format_local;
use crate::error::Result;
use crate::session::SessionManager;
use colored::Colorize;

/// Handle `lenscoach quota`
pub fn show_quota(manager: &SessionManager) -> Result<()> {
    let session = manager.ensure_current_session()?;
    let status = manager.rate_limit_status(&session);
    let limit = manager.limits().max_prompts;

    println!("Session: {} ({})", session.title.bold(), session.id.cyan());

    if status.allowed {
        println!(
            "{}",
            format!("{} of {} prompts remaining in this window.", status.remaining, limit)
                .green()
        );
        let window_end = session
            .first_prompt_in_window
            .and_then(|start| start.checked_add_signed(manager.limits().window));
        if let Some(end) = window_end {
            if session.prompt_count > 0 && status.remaining < limit {
                println!("Window resets at {}.", format_local(end));
            }
        }
    } else {
        let reset = status
            .reset_time
            .map(format_local)
            .unwrap_or_else(|| "later".to_string());
        println!(
            "{}",
            format!("0 of {} prompts remaining. Window resets at {}.", limit, reset).yellow()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{manager_with_clock, memory_manager};
    use chrono::{DateTime, Duration, Utc};

    #[test]
    fn test_show_quota_creates_session_when_missing() {
        let manager = memory_manager();
        show_quota(&manager).unwrap();
        assert_eq!(manager.list_sessions().len(), 1);
    }

    #[test]
    fn test_show_quota_when_exhausted() {
        let (manager, _clock) = manager_with_clock();
        let mut session = manager.ensure_current_session().unwrap();
        for i in 0..manager.limits().max_prompts {
            session = manager
                .record_exchange(&session, &format!("prompt {}", i), &[], "ok")
                .unwrap();
        }
        assert!(!manager.rate_limit_status(&session).allowed);
        show_quota(&manager).unwrap();
    }

    #[test]
    fn test_show_quota_with_unrepresentable_window_end() {
        let mut config = crate::config::Config::default();
        config.sessions.window_hours = crate::config::MAX_WINDOW_HOURS;
        let manager = crate::commands::build_manager(&config, true).unwrap();

        let mut session = manager.ensure_current_session().unwrap();
        session.prompt_count = 3;
        session.first_prompt_in_window = Some(DateTime::<Utc>::MAX_UTC - Duration::hours(1));
        manager.store().save_session(&session).unwrap();

        show_quota(&manager).unwrap();
    }
}
