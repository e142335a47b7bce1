//! Service Traits
//!
//! Abstract interfaces over the tracker REST API so the HTTP client, the
//! in-process mock and the fallback wrapper are interchangeable.

use async_trait::async_trait;

use super::error::ApiError;
use crate::domain::{
    AuthTokens, CreateHabitRequest, HabitId, HabitListResponse, LoginRequest, Progress,
    RegisterRequest, ReminderRecord, UpdateHabitRequest, VersionResponse,
};

/// `/auth/*` endpoints
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ApiError>;

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError>;

    async fn logout(&self, access_token: &str) -> Result<String, ApiError>;
}

/// `/tracker/*` endpoints. Every call takes the raw access token.
#[async_trait]
pub trait HabitService: Send + Sync {
    async fn list_habits(&self, token: &str) -> Result<HabitListResponse, ApiError>;

    async fn list_completed_habits(&self, token: &str) -> Result<HabitListResponse, ApiError>;

    async fn create_habit(&self, request: &CreateHabitRequest, token: &str) -> Result<String, ApiError>;

    async fn update_habit(&self, request: &UpdateHabitRequest, token: &str) -> Result<String, ApiError>;

    async fn delete_habit(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError>;

    async fn get_progress(&self, habit_id: HabitId, token: &str) -> Result<Progress, ApiError>;

    async fn add_progress(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError>;

    /// Reminders for incomplete habits, already normalized
    async fn get_reminders(&self, token: &str) -> Result<Vec<ReminderRecord>, ApiError>;
}

/// Simulated clock (`/time/*`) and `/version`
#[async_trait]
pub trait SystemService: Send + Sync {
    async fn current_time(&self, token: &str) -> Result<String, ApiError>;

    async fn next_day(&self, token: &str) -> Result<String, ApiError>;

    async fn reset_time(&self, token: &str) -> Result<String, ApiError>;

    async fn version(&self) -> Result<VersionResponse, ApiError>;
}
