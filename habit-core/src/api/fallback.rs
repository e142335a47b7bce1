//! Offline fallback: answer from a secondary service when the primary one
//! cannot be reached.

use async_trait::async_trait;

use super::error::ApiError;
use super::traits::{AuthService, HabitService, SystemService};
use crate::domain::{
    AuthTokens, CreateHabitRequest, HabitId, HabitListResponse, LoginRequest, Progress,
    RegisterRequest, ReminderRecord, UpdateHabitRequest, VersionResponse,
};

/// Delegates to `primary`; a network error reroutes that single call to
/// `fallback`. HTTP errors from the primary are returned unchanged.
pub struct FallbackService<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackService<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

macro_rules! with_fallback {
    ($self:ident, $op:literal, $method:ident ( $($arg:expr),* )) => {
        match $self.primary.$method($($arg),*).await {
            Err(e) if e.is_network() => {
                tracing::warn!(operation = $op, error = %e, "service unreachable, using offline data");
                $self.fallback.$method($($arg),*).await
            }
            other => other,
        }
    };
}

#[async_trait]
impl<P: AuthService, F: AuthService> AuthService for FallbackService<P, F> {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        with_fallback!(self, "register", register(request))
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ApiError> {
        with_fallback!(self, "login", login(request))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        with_fallback!(self, "refresh", refresh(refresh_token))
    }

    async fn logout(&self, access_token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "logout", logout(access_token))
    }
}

#[async_trait]
impl<P: HabitService, F: HabitService> HabitService for FallbackService<P, F> {
    async fn list_habits(&self, token: &str) -> Result<HabitListResponse, ApiError> {
        with_fallback!(self, "list_habits", list_habits(token))
    }

    async fn list_completed_habits(&self, token: &str) -> Result<HabitListResponse, ApiError> {
        with_fallback!(self, "list_completed_habits", list_completed_habits(token))
    }

    async fn create_habit(&self, request: &CreateHabitRequest, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "create_habit", create_habit(request, token))
    }

    async fn update_habit(&self, request: &UpdateHabitRequest, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "update_habit", update_habit(request, token))
    }

    async fn delete_habit(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "delete_habit", delete_habit(habit_id, token))
    }

    async fn get_progress(&self, habit_id: HabitId, token: &str) -> Result<Progress, ApiError> {
        with_fallback!(self, "get_progress", get_progress(habit_id, token))
    }

    async fn add_progress(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "add_progress", add_progress(habit_id, token))
    }

    async fn get_reminders(&self, token: &str) -> Result<Vec<ReminderRecord>, ApiError> {
        with_fallback!(self, "get_reminders", get_reminders(token))
    }
}

#[async_trait]
impl<P: SystemService, F: SystemService> SystemService for FallbackService<P, F> {
    async fn current_time(&self, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "current_time", current_time(token))
    }

    async fn next_day(&self, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "next_day", next_day(token))
    }

    async fn reset_time(&self, token: &str) -> Result<String, ApiError> {
        with_fallback!(self, "reset_time", reset_time(token))
    }

    async fn version(&self) -> Result<VersionResponse, ApiError> {
        with_fallback!(self, "version", version())
    }
}
