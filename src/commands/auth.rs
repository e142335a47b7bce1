//! Account commands

use anyhow::{Context, Result};

use crate::app::AppState;

pub async fn register(state: &AppState, username: &str, email: &str, password: &str) -> Result<String> {
    let message = state
        .session
        .register(username, email, password)
        .await
        .context("Registration failed")?;
    Ok(if message.is_empty() {
        format!("Пользователь {} зарегистрирован", username)
    } else {
        message
    })
}

pub async fn login(state: &AppState, username: &str, password: &str) -> Result<String> {
    state
        .session
        .login(username, password)
        .await
        .context("Login failed")?;
    Ok(format!("Вход выполнен: {}", username))
}

pub async fn logout(state: &AppState) -> Result<String> {
    if !state.session.is_authenticated().await {
        return Ok("Вы не вошли в систему".to_string());
    }
    state.session.logout().await;
    Ok("Выход выполнен".to_string())
}
