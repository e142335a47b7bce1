//! Reminders for the current period

use anyhow::{Context, Result};
use habit_core::display::{frequency_label, reminder_badge, reminder_line, EMPTY_REMINDERS};

use crate::app::AppState;

pub async fn list(state: &AppState) -> Result<String> {
    let reminders = state.feed.fetch().await.context("Failed to load reminders")?;
    if reminders.is_empty() {
        return Ok(EMPTY_REMINDERS.to_string());
    }

    let lines: Vec<String> = reminders
        .iter()
        .map(|reminder| {
            format!(
                "#{} {} ({})\n   {} | {}",
                reminder.habit_id(),
                reminder.record.description,
                frequency_label(reminder.record.frequency_type),
                reminder_line(reminder),
                reminder_badge(reminder)
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
