//! Repository Layer - Core Traits
//!
//! Abstract interfaces for the durable per-habit period memory and the
//! login session. Implementations can use SQLite, in-memory maps or browser
//! storage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{AuthTokens, DomainResult, HabitId};

/// Durable key-value memory: last period number observed per habit.
///
/// Survives restarts, scoped to one user/device. Entries are never deleted;
/// a stale entry for a removed habit is simply never read again.
pub trait PeriodMemory: Send + Sync {
    /// Last stored period number for the habit, `None` if never observed
    fn get(&self, habit_id: HabitId) -> DomainResult<Option<i64>>;

    /// Store the period number for the habit
    fn set(&self, habit_id: HabitId, period_number: i64) -> DomainResult<()>;
}

impl<T: PeriodMemory + ?Sized> PeriodMemory for Arc<T> {
    fn get(&self, habit_id: HabitId) -> DomainResult<Option<i64>> {
        (**self).get(habit_id)
    }

    fn set(&self, habit_id: HabitId, period_number: i64) -> DomainResult<()> {
        (**self).set(habit_id, period_number)
    }
}

/// Logged-in user and their token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    pub tokens: AuthTokens,
}

/// Durable storage for the single active session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> DomainResult<Option<StoredSession>>;

    fn save(&self, session: &StoredSession) -> DomainResult<()>;

    fn clear(&self) -> DomainResult<()>;
}
