//! Habit tracker client core.
//!
//! Layers:
//! - [`domain`]: entities and wire shapes
//! - [`repository`]: period memory and session persistence
//! - [`api`]: REST services, mock backend and offline fallback
//! - [`resolver`], [`feed`]: reminder display state
//! - [`session`], [`query`], [`display`]: client-side logic around the service

pub mod api;
pub mod display;
pub mod domain;
pub mod feed;
pub mod query;
pub mod repository;
pub mod resolver;
pub mod session;

pub use api::{ApiError, Services, ServiceOptions};
pub use domain::{DomainError, DomainResult, Habit, HabitId, ReminderRecord, ResolvedReminder};
pub use feed::ReminderFeed;
pub use query::{HabitPage, HabitQuery, SortOption};
pub use repository::PeriodMemory;
pub use resolver::{ReminderResolver, Resolution};
pub use session::AuthSession;
