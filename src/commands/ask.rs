use super::format_local;
use crate::error::Result;
use crate::providers::PromptClient;
use crate::session::{PromptOutcome, SessionManager};
use crate::settings_parser::parse_camera_settings;
use colored::Colorize;

/// Handle `lenscoach ask`
///
/// Rate-limit and backend failures are reported to the user and are not
/// errors; only storage failures propagate.
pub async fn run_ask(
    manager: &SessionManager,
    client: &dyn PromptClient,
    prompt: &str,
    images: &[String],
) -> Result<()> {
    if prompt.trim().is_empty() && images.is_empty() {
        println!("{}", "Add a question or at least one --image.".yellow());
        return Ok(());
    }

    let session = manager.ensure_current_session()?;
    tracing::info!(session_id = %session.id, images = images.len(), "Submitting prompt");

    match manager.submit_prompt(&session, prompt, images, client).await? {
        PromptOutcome::Answered { session, reply } => {
            println!("\n{}\n", reply);

            let settings = parse_camera_settings(&reply);
            if !settings.is_empty() {
                println!("{}", "Settings at a glance:".bold());
                for (label, value) in settings.entries() {
                    println!("  {:<14} {}", format!("{}:", label).cyan(), value);
                }
                println!();
            }

            let status = manager.rate_limit_status(&session);
            println!(
                "{}",
                format!(
                    "{} of {} prompts left in this window · session \"{}\"",
                    status.remaining,
                    manager.limits().max_prompts,
                    session.title
                )
                .dimmed()
            );
        }
        PromptOutcome::RateLimited(status) => {
            let reset = status
                .reset_time
                .map(format_local)
                .unwrap_or_else(|| "later".to_string());
            println!(
                "{}",
                format!(
                    "Rate limit reached: {} prompts per session window. Try again after {} or start a new session with `lenscoach new`.",
                    manager.limits().max_prompts,
                    reset
                )
                .yellow()
            );
        }
        PromptOutcome::Failed { error, .. } => {
            eprintln!("{} {}", "Error:".red().bold(), error);
        }
    }

    Ok(())
}
