//! Domain Layer
//!
//! Entities and wire shapes of the habit tracker service.
//! This layer only depends on serde, serde_json, chrono and thiserror.

mod auth;
mod error;
mod habit;
mod progress;
mod reminder;

pub use auth::{
    AuthTokens, LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    VersionResponse,
};
pub use error::{DomainError, DomainResult};
pub use habit::{
    CompletionStamp, CreateHabitRequest, FrequencyType, Goal, GoalSpec, Habit, HabitId,
    HabitListResponse, UpdateHabitRequest,
};
pub use progress::{HabitRef, Progress, ProgressData};
pub use reminder::{normalize_reminders, ReminderRecord, ResolvedReminder};
