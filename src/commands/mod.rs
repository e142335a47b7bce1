//! Command Handlers
//!
//! One handler per CLI command. Handlers return the text to print.

pub mod auth;
pub mod habit;
pub mod progress;
pub mod reminder;
pub mod system;

use anyhow::Result;

use crate::app::AppState;
use crate::cli::{Command, ConfigCommand, HabitsCommand, ProgressCommand, TimeCommand};
use habit::{GoalArgs, ListOptions};

pub async fn dispatch(state: &AppState, command: Command) -> Result<String> {
    match command {
        Command::Register { username, email, password } => {
            auth::register(state, &username, &email, &password).await
        }
        Command::Login { username, password } => auth::login(state, &username, &password).await,
        Command::Logout => auth::logout(state).await,
        Command::Habits(cmd) => match cmd {
            HabitsCommand::List { search, sort, page } => {
                habit::list(state, ListOptions { search, sort, page }).await
            }
            HabitsCommand::Completed => habit::completed(state).await,
            HabitsCommand::Create { description, frequency, times, periods } => {
                habit::create(state, description, GoalArgs { frequency, times, periods }).await
            }
            HabitsCommand::Update { id, description, frequency, times, periods } => {
                habit::update(state, id, description, GoalArgs { frequency, times, periods }).await
            }
            HabitsCommand::Delete { id } => habit::delete(state, id).await,
        },
        Command::Progress(cmd) => match cmd {
            ProgressCommand::Show { id } => progress::show(state, id).await,
            ProgressCommand::Add { id } => progress::add(state, id).await,
        },
        Command::Reminders => reminder::list(state).await,
        Command::Time(cmd) => match cmd {
            TimeCommand::Now => system::current_time(state).await,
            TimeCommand::NextDay => system::next_day(state).await,
            TimeCommand::Reset => system::reset_time(state).await,
        },
        Command::Version => system::version(state).await,
        Command::Config(ConfigCommand::Show) => system::show_config(state).await,
        Command::Logs { lines } => system::logs(state, lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use habit_core::repository::init_db;
    use habit_core::SortOption;
    use std::path::Path;

    fn mock_state(dir: &Path) -> AppState {
        let config = AppConfig {
            use_mock: true,
            ..Default::default()
        };
        let db = init_db(Path::new(":memory:")).unwrap();
        AppState::with_db(dir, config, db).unwrap()
    }

    async fn run(state: &AppState, command: Command) -> String {
        dispatch(state, command).await.unwrap()
    }

    async fn logged_in(dir: &Path) -> AppState {
        let state = mock_state(dir);
        run(
            &state,
            Command::Login { username: "anna".into(), password: "pw".into() },
        )
        .await;
        state
    }

    #[tokio::test]
    async fn test_commands_require_login() {
        let dir = tempfile::tempdir().unwrap();
        let state = mock_state(dir.path());
        let err = dispatch(&state, Command::Reminders).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Not authenticated"));
    }

    #[tokio::test]
    async fn test_habit_list_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;

        let out = run(
            &state,
            Command::Habits(HabitsCommand::List { search: None, sort: Some("date-asc".into()), page: 1 }),
        )
        .await;
        let first = out.find("#1 ").unwrap();
        let third = out.find("#3 ").unwrap();
        assert!(first < third);
        assert!(out.contains("Общий прогресс: 67%"));
        assert!(out.contains("Страница 1 из 1"));
        assert_eq!(state.sort_preference(), SortOption::DateAsc);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;
        let out = run(
            &state,
            Command::Habits(HabitsCommand::List { search: Some("плавание".into()), sort: None, page: 1 }),
        )
        .await;
        assert_eq!(out, "Ничего не найдено");
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;

        let created = run(
            &state,
            Command::Habits(HabitsCommand::Create {
                description: "Пить воду".into(),
                frequency: "weekly".into(),
                times: 3,
                periods: 4,
            }),
        )
        .await;
        assert_eq!(created, "Привычка успешно создана");

        let out = run(
            &state,
            Command::Habits(HabitsCommand::List { search: Some("воду".into()), sort: None, page: 1 }),
        )
        .await;
        assert!(out.contains("Цель: 3 раз еженедельно"));
    }

    #[tokio::test]
    async fn test_progress_add_and_show() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;

        let added = run(&state, Command::Progress(ProgressCommand::Add { id: 1 })).await;
        assert!(added.starts_with("Прогресс успешно добавлен"));

        let shown = run(&state, Command::Progress(ProgressCommand::Show { id: 1 })).await;
        assert!(shown.contains("Всего выполнений: 21"));
        assert!(shown.contains("Текущая серия: 6"));
    }

    #[tokio::test]
    async fn test_empty_reminders_message() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;
        let out = run(&state, Command::Reminders).await;
        assert_eq!(out, habit_core::display::EMPTY_REMINDERS);
    }

    #[tokio::test]
    async fn test_time_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;

        assert!(run(&state, Command::Time(TimeCommand::Now)).await.starts_with("Текущая дата: "));
        assert!(run(&state, Command::Time(TimeCommand::NextDay))
            .await
            .starts_with("Время изменено на: "));
        assert!(run(&state, Command::Version).await.contains("1.0.0-mock"));
    }

    #[tokio::test]
    async fn test_logout_forgets_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;

        assert_eq!(run(&state, Command::Logout).await, "Выход выполнен");
        assert_eq!(run(&state, Command::Logout).await, "Вы не вошли в систему");
        assert!(state.sessions.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_config_show() {
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in(dir.path()).await;
        let out = run(&state, Command::Config(ConfigCommand::Show)).await;
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["user"], "anna");
        assert_eq!(value["config"]["use_mock"], true);
    }

    #[tokio::test]
    async fn test_logs_tail_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = crate::config::log_dir(dir.path());
        std::fs::create_dir_all(&logs).unwrap();
        std::fs::write(logs.join("HabitTracker.log"), "a\nb\nc\n").unwrap();

        let state = mock_state(dir.path());
        assert_eq!(run(&state, Command::Logs { lines: 2 }).await, "b\nc");
    }
}
