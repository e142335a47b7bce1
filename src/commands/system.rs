//! Simulated clock, version, config and log commands

use anyhow::{Context, Result};

use crate::app::AppState;
use crate::config::{log_dir, LOG_APP_NAME};

pub async fn current_time(state: &AppState) -> Result<String> {
    let system = state.services.system.clone();
    let now = state
        .session
        .call(|token| {
            let system = system.clone();
            async move { system.current_time(&token).await }
        })
        .await
        .context("Failed to read server time")?;
    Ok(format!("Текущая дата: {}", now))
}

pub async fn next_day(state: &AppState) -> Result<String> {
    let system = state.services.system.clone();
    let message = state
        .session
        .call(|token| {
            let system = system.clone();
            async move { system.next_day(&token).await }
        })
        .await
        .context("Failed to advance time")?;
    Ok(message)
}

pub async fn reset_time(state: &AppState) -> Result<String> {
    let system = state.services.system.clone();
    let message = state
        .session
        .call(|token| {
            let system = system.clone();
            async move { system.reset_time(&token).await }
        })
        .await
        .context("Failed to reset time")?;
    Ok(message)
}

pub async fn version(state: &AppState) -> Result<String> {
    let server = state
        .services
        .system
        .version()
        .await
        .context("Failed to read server version")?;
    Ok(format!(
        "Клиент: {}\nСервер: {}",
        env!("CARGO_PKG_VERSION"),
        server.version
    ))
}

pub async fn show_config(state: &AppState) -> Result<String> {
    let user = state.session.username().await;
    let value = serde_json::json!({
        "data_dir": state.data_dir.display().to_string(),
        "config": state.config,
        "user": user,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn logs(state: &AppState, lines: usize) -> Result<String> {
    let path = rolling_logger::log_file_path()
        .unwrap_or_else(|| log_dir(&state.data_dir).join(format!("{}.log", LOG_APP_NAME)));
    let tail = match rolling_logger::read_log_tail(&path, lines) {
        Ok(tail) => tail,
        Err(e) => {
            // Lines from this run are still in memory
            let recent = rolling_logger::recent_logs();
            if recent.is_empty() {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
            let start = recent.len().saturating_sub(lines);
            recent[start..].to_vec()
        }
    };
    Ok(tail.join("\n"))
}
