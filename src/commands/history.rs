use super::format_local;
use crate::cli::HistoryCommand;
use crate::error::{LensCoachError, Result};
use crate::session::{MessageKind, SessionManager};
use chrono::{DateTime, Utc};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle history commands
pub fn handle_history(manager: &SessionManager, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List => list_sessions(manager),
        HistoryCommand::Show { id } => show_session(manager, id),
        HistoryCommand::Switch { id } => match manager.switch_session(&id) {
            Ok(session) => {
                println!(
                    "{}",
                    format!("Switched to session {} ({})", session.id, session.title).green()
                );
                Ok(())
            }
            Err(e) => report_not_found(e),
        },
        HistoryCommand::Delete { id } => {
            let replacement = manager.delete_session(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
            if let Some(session) = replacement {
                println!("Started a new current session {}", session.id.cyan());
            }
            Ok(())
        }
        HistoryCommand::Clear => {
            manager.store().clear_all_sessions()?;
            println!("{}", "Cleared all sessions.".green());
            Ok(())
        }
    }
}

fn list_sessions(manager: &SessionManager) -> Result<()> {
    let sessions = manager.list_sessions();

    if sessions.is_empty() {
        println!("{}", "No sessions found.".yellow());
        return Ok(());
    }

    let current = manager.store().get_current_session_id();
    let now = Utc::now();

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Prompts".bold(),
        "Last Active".bold()
    ]);

    for session in sessions {
        let marker = if current.as_deref() == Some(session.id.as_str()) {
            "*"
        } else {
            ""
        };
        let title = if session.title.chars().count() > 40 {
            format!("{}...", session.title.chars().take(37).collect::<String>())
        } else {
            session.title
        };

        table.add_row(prettytable::row![
            marker.green(),
            session.id.cyan(),
            title,
            session.message_count,
            format!("{}/{}", session.prompt_count, manager.limits().max_prompts),
            format_relative(session.last_activity_at, now)
        ]);
    }

    println!("\nSession History:");
    table.printstd();
    println!();
    println!(
        "Use {} to resume a session.",
        "lenscoach history switch <ID>".cyan()
    );
    println!();

    Ok(())
}

fn show_session(manager: &SessionManager, id: Option<String>) -> Result<()> {
    let session = match id {
        Some(id) => match manager.store().get_session(&id) {
            Some(session) => session,
            None => return report_not_found(LensCoachError::SessionNotFound(id).into()),
        },
        None => manager.ensure_current_session()?,
    };

    println!(
        "\n{} {}",
        session.title.bold(),
        format!("(started {})", format_local(session.created_at)).dimmed()
    );

    if session.messages.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return Ok(());
    }

    for message in &session.messages {
        let who = match message.kind {
            MessageKind::User => "You".cyan().bold(),
            MessageKind::Ai => "Coach".magenta().bold(),
        };
        println!("\n{} {}", who, format_local(message.timestamp).dimmed());
        for image in &message.images {
            println!("  📷 {}", image);
        }
        if !message.text.is_empty() {
            println!("{}", message.text);
        }
    }
    println!();

    Ok(())
}

/// Print a not-found condition as a notification; other errors propagate
fn report_not_found(error: anyhow::Error) -> Result<()> {
    match error.downcast_ref::<LensCoachError>() {
        Some(LensCoachError::SessionNotFound(id)) => {
            println!(
                "{}",
                format!(
                    "Session {} no longer exists (it may have been deleted or evicted).",
                    id
                )
                .yellow()
            );
            Ok(())
        }
        _ => Err(error),
    }
}

/// Short "how long ago" label for listings
fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);

    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        format_local(ts)
    }
}
