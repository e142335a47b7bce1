//! Progress commands

use anyhow::{Context, Result};
use habit_core::display::{percentage, reminder_badge, reminder_line};
use habit_core::domain::HabitId;

use crate::app::AppState;

pub async fn show(state: &AppState, id: HabitId) -> Result<String> {
    let habits = state.services.habits.clone();
    let progress = state
        .session
        .call(|token| {
            let habits = habits.clone();
            async move { habits.get_progress(id, &token).await }
        })
        .await
        .context("Failed to load progress")?;

    let stats = progress.stats();
    let title = progress
        .habit
        .as_ref()
        .map(|h| h.description.clone())
        .unwrap_or_else(|| format!("Привычка #{}", id));
    let periods = progress
        .goal
        .as_ref()
        .map(|g| g.total_tracking_periods)
        .unwrap_or(0);

    let mut lines = vec![
        title,
        format!(
            "Выполнено периодов: {} из {} ({}%)",
            stats.total_completed_periods,
            periods,
            percentage(stats.total_completed_periods, periods)
        ),
        format!("Всего выполнений: {}", stats.total_completed_times),
        format!("Пропущено периодов: {}", stats.total_skipped_periods),
        format!("Текущая серия: {}", stats.current_streak),
        format!("Лучшая серия: {}", stats.most_longest_streak),
    ];

    match state.feed.fetch().await {
        Ok(_) => {
            if let Some(reminder) = state.feed.reminder_for(id).await {
                lines.push(format!("{} | {}", reminder_line(&reminder), reminder_badge(&reminder)));
            }
        }
        Err(e) => tracing::warn!(habit_id = id, error = %e, "reminders unavailable"),
    }

    Ok(lines.join("\n"))
}

pub async fn add(state: &AppState, id: HabitId) -> Result<String> {
    let habits = state.services.habits.clone();
    let message = state
        .session
        .call(|token| {
            let habits = habits.clone();
            async move { habits.add_progress(id, &token).await }
        })
        .await
        .context("Failed to add progress")?;

    let mut lines = vec![if message.is_empty() {
        "Прогресс добавлен".to_string()
    } else {
        message
    }];

    // Refresh so the period memory sees the new state right away
    match state.feed.fetch().await {
        Ok(_) => {
            if let Some(reminder) = state.feed.reminder_for(id).await {
                lines.push(reminder_line(&reminder));
            }
        }
        Err(e) => tracing::warn!(habit_id = id, error = %e, "reminders unavailable"),
    }
    Ok(lines.join("\n"))
}
