//! Mock Service
//!
//! In-process stand-in for the tracker service: seeded demo habits, progress
//! counters and a simulated clock. Used in demo mode and as the offline
//! fallback for network failures.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use tokio::sync::Mutex;

use super::error::ApiError;
use super::traits::{AuthService, HabitService, SystemService};
use crate::domain::{
    AuthTokens, CreateHabitRequest, FrequencyType, Goal, GoalSpec, Habit, HabitId,
    HabitListResponse, HabitRef, LoginRequest, Progress, ProgressData, RegisterRequest,
    ReminderRecord, UpdateHabitRequest, VersionResponse,
};

pub const MOCK_USERNAME: &str = "testuser";
pub const MOCK_VERSION: &str = "1.0.0-mock";

const FIRST_CREATED_ID: HabitId = 100;

struct MockState {
    habits: Vec<Habit>,
    completed: Vec<Habit>,
    progress: HashMap<HabitId, Progress>,
    today: NaiveDate,
    next_id: HabitId,
    token_serial: u64,
}

fn daily_goal(times: u32, periods: u32, completed: bool) -> Goal {
    Goal {
        is_completed: Some(completed),
        ..GoalSpec::new(FrequencyType::Daily, times, periods).into_goal()
    }
}

fn seeded_progress(habit: &Habit, stats: [u32; 5]) -> Progress {
    let [periods, times, skipped, longest, current] = stats;
    Progress {
        goal: Some(habit.goal.clone()),
        progress: Some(ProgressData {
            total_completed_periods: periods,
            total_completed_times: times,
            total_skipped_periods: skipped,
            most_longest_streak: longest,
            current_streak: current,
        }),
        habit: Some(HabitRef {
            id: habit.id,
            description: habit.description.clone(),
        }),
    }
}

impl MockState {
    fn seeded(today: NaiveDate) -> Self {
        let habits = vec![
            Habit::new(1, "15 минут упражнений каждое утро".to_string(), daily_goal(1, 30, false)),
            Habit::new(2, "Читать минимум 30 минут в день".to_string(), daily_goal(1, 60, true)),
            Habit::new(3, "10 минут медитации перед сном".to_string(), daily_goal(1, 21, false)),
        ];
        let completed = vec![Habit::new(
            4,
            "Завершенный курс по React".to_string(),
            daily_goal(2, 90, true),
        )];

        let progress = [
            (&habits[0], [20, 20, 5, 7, 5]),
            (&habits[1], [60, 60, 0, 15, 12]),
            (&habits[2], [8, 8, 2, 4, 3]),
        ]
        .into_iter()
        .map(|(habit, stats)| (habit.id, seeded_progress(habit, stats)))
        .collect();

        Self {
            habits,
            completed,
            progress,
            today,
            next_id: FIRST_CREATED_ID,
            token_serial: 0,
        }
    }

    fn issue_tokens(&mut self) -> AuthTokens {
        self.token_serial += 1;
        AuthTokens {
            access_token: format!("mock-access-{}", self.token_serial),
            refresh_token: format!("mock-refresh-{}", self.token_serial),
        }
    }
}

/// Demo backend implementing every service trait in memory
pub struct MockService {
    state: Mutex<MockState>,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    pub fn new() -> Self {
        Self::starting_at(Utc::now().date_naive())
    }

    /// Mock whose simulated clock starts at `today`
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(MockState::seeded(today)),
        }
    }
}

fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl AuthService for MockService {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        tracing::debug!(username = %request.username, "mock register");
        Ok("Пользователь успешно зарегистрирован".to_string())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ApiError> {
        tracing::debug!(username = %request.username, "mock login");
        Ok(self.state.lock().await.issue_tokens())
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<AuthTokens, ApiError> {
        Ok(self.state.lock().await.issue_tokens())
    }

    async fn logout(&self, _access_token: &str) -> Result<String, ApiError> {
        Ok("Выход выполнен".to_string())
    }
}

#[async_trait]
impl HabitService for MockService {
    async fn list_habits(&self, _token: &str) -> Result<HabitListResponse, ApiError> {
        let state = self.state.lock().await;
        Ok(HabitListResponse {
            username: MOCK_USERNAME.to_string(),
            habits: state.habits.clone(),
        })
    }

    async fn list_completed_habits(&self, _token: &str) -> Result<HabitListResponse, ApiError> {
        let state = self.state.lock().await;
        Ok(HabitListResponse {
            username: MOCK_USERNAME.to_string(),
            habits: state.completed.clone(),
        })
    }

    async fn create_habit(&self, request: &CreateHabitRequest, _token: &str) -> Result<String, ApiError> {
        request.validate()?;
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;
        state.habits.push(Habit::new(
            id,
            request.description.clone(),
            request.goal.clone().into_goal(),
        ));
        tracing::debug!(habit_id = id, "mock habit created");
        Ok("Привычка успешно создана".to_string())
    }

    async fn update_habit(&self, request: &UpdateHabitRequest, _token: &str) -> Result<String, ApiError> {
        request.validate()?;
        let mut state = self.state.lock().await;
        if let Some(habit) = state.habits.iter_mut().find(|h| h.id == request.id) {
            habit.description = request.description.clone();
            habit.goal = request.goal.clone().into_goal();
        }
        Ok("Привычка успешно обновлена".to_string())
    }

    async fn delete_habit(&self, habit_id: HabitId, _token: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        state.habits.retain(|h| h.id != habit_id);
        Ok("Привычка успешно удалена".to_string())
    }

    async fn get_progress(&self, habit_id: HabitId, _token: &str) -> Result<Progress, ApiError> {
        let state = self.state.lock().await;
        Ok(state.progress.get(&habit_id).cloned().unwrap_or_else(|| Progress {
            goal: Some(daily_goal(1, 30, false)),
            progress: Some(ProgressData::default()),
            habit: Some(HabitRef {
                id: habit_id,
                description: "Неизвестная привычка".to_string(),
            }),
        }))
    }

    async fn add_progress(&self, habit_id: HabitId, _token: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        if let Some(stats) = state
            .progress
            .get_mut(&habit_id)
            .and_then(|p| p.progress.as_mut())
        {
            stats.total_completed_periods += 1;
            stats.total_completed_times += 1;
            stats.current_streak += 1;
            stats.most_longest_streak = stats.most_longest_streak.max(stats.current_streak);
        }
        Ok("Прогресс успешно добавлен".to_string())
    }

    async fn get_reminders(&self, _token: &str) -> Result<Vec<ReminderRecord>, ApiError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SystemService for MockService {
    async fn current_time(&self, _token: &str) -> Result<String, ApiError> {
        Ok(date_string(self.state.lock().await.today))
    }

    async fn next_day(&self, _token: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        state.today = state
            .today
            .checked_add_days(Days::new(1))
            .unwrap_or(state.today);
        Ok(format!("Время изменено на: {}", date_string(state.today)))
    }

    async fn reset_time(&self, _token: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        state.today = Utc::now().date_naive();
        Ok(format!("Время сброшено на: {}", date_string(state.today)))
    }

    async fn version(&self) -> Result<VersionResponse, ApiError> {
        Ok(VersionResponse {
            version: MOCK_VERSION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> MockService {
        MockService::starting_at(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap())
    }

    #[tokio::test]
    async fn test_seed_data() {
        let mock = mock();
        let active = mock.list_habits("t").await.unwrap();
        assert_eq!(active.username, MOCK_USERNAME);
        assert_eq!(active.habits.len(), 3);
        assert_eq!(mock.list_completed_habits("t").await.unwrap().habits[0].id, 4);
        assert!(mock.get_reminders("t").await.unwrap().is_empty());
        assert_eq!(mock.version().await.unwrap().version, MOCK_VERSION);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let mock = mock();
        let goal = GoalSpec::new(FrequencyType::Weekly, 3, 8);
        mock.create_habit(
            &CreateHabitRequest { description: "Плавать".to_string(), goal: goal.clone() },
            "t",
        )
        .await
        .unwrap();

        let habits = mock.list_habits("t").await.unwrap().habits;
        let created = habits.last().unwrap();
        assert_eq!(created.id, FIRST_CREATED_ID);
        assert_eq!(created.goal.frequency_type, FrequencyType::Weekly);

        mock.update_habit(
            &UpdateHabitRequest { id: created.id, description: "Бегать".to_string(), goal },
            "t",
        )
        .await
        .unwrap();
        let habits = mock.list_habits("t").await.unwrap().habits;
        assert_eq!(habits.last().unwrap().description, "Бегать");

        mock.delete_habit(FIRST_CREATED_ID, "t").await.unwrap();
        assert_eq!(mock.list_habits("t").await.unwrap().habits.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_create_is_rejected() {
        let mock = mock();
        let request = CreateHabitRequest {
            description: "x".to_string(),
            goal: GoalSpec::new(FrequencyType::Daily, 0, 10),
        };
        let err = mock.create_habit(&request, "t").await.unwrap_err();
        assert!(matches!(err, ApiError::Domain(_)));
    }

    #[tokio::test]
    async fn test_add_progress_extends_streak() {
        let mock = mock();
        mock.add_progress(3, "t").await.unwrap();
        mock.add_progress(3, "t").await.unwrap();
        let stats = mock.get_progress(3, "t").await.unwrap().stats();
        assert_eq!(stats.total_completed_times, 10);
        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.most_longest_streak, 5);
    }

    #[tokio::test]
    async fn test_unknown_progress_placeholder() {
        let progress = mock().get_progress(77, "t").await.unwrap();
        assert_eq!(progress.habit.as_ref().unwrap().description, "Неизвестная привычка");
        assert_eq!(progress.stats(), ProgressData::default());
    }

    #[tokio::test]
    async fn test_simulated_clock() {
        let mock = mock();
        assert_eq!(mock.current_time("t").await.unwrap(), "2024-02-28");
        assert_eq!(
            mock.next_day("t").await.unwrap(),
            "Время изменено на: 2024-02-29"
        );
        mock.next_day("t").await.unwrap();
        assert_eq!(mock.current_time("t").await.unwrap(), "2024-03-01");
        mock.reset_time("t").await.unwrap();
        assert_eq!(
            mock.current_time("t").await.unwrap(),
            Utc::now().date_naive().format("%Y-%m-%d").to_string()
        );
    }

    #[tokio::test]
    async fn test_tokens_rotate_on_refresh() {
        let mock = mock();
        let login = mock
            .login(&LoginRequest { username: "a".into(), password: "b".into() })
            .await
            .unwrap();
        let refreshed = mock.refresh(&login.refresh_token).await.unwrap();
        assert_ne!(login.access_token, refreshed.access_token);
    }
}
