//! In-memory stores for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{PeriodMemory, SessionStore, StoredSession};
use crate::domain::{DomainResult, HabitId};

/// In-memory implementation of PeriodMemory
#[derive(Default)]
pub struct InMemoryPeriodMemory {
    periods: Mutex<HashMap<HabitId, i64>>,
}

impl InMemoryPeriodMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate one entry
    pub fn with_entry(self, habit_id: HabitId, period_number: i64) -> Self {
        self.periods
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(habit_id, period_number);
        self
    }

    pub fn len(&self) -> usize {
        self.periods
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PeriodMemory for InMemoryPeriodMemory {
    fn get(&self, habit_id: HabitId) -> DomainResult<Option<i64>> {
        let periods = self
            .periods
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(periods.get(&habit_id).copied())
    }

    fn set(&self, habit_id: HabitId, period_number: i64) -> DomainResult<()> {
        self.periods
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(habit_id, period_number);
        Ok(())
    }
}

/// Session kept only for the lifetime of the process
#[derive(Default)]
pub struct InMemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> DomainResult<Option<StoredSession>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, session: &StoredSession) -> DomainResult<()> {
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
