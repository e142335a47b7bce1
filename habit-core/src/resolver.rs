//! Reminder Display State
//!
//! The reminder endpoint reports `0 completed / 0 remaining` both right after
//! a period's target was met and at the start of a new period with nothing
//! logged. The last period number seen for each habit is kept in a
//! [`PeriodMemory`] to tell the two apart:
//!
//! | memory          | record                    | display    | memory after |
//! |-----------------|---------------------------|------------|--------------|
//! | absent          | satisfied, period `p`     | full       | `p`          |
//! | `n`             | satisfied, period `n`     | full       | `n`          |
//! | `n`             | satisfied, period `p != n`| 0          | `p`          |
//! | anything        | not satisfied, period `p` | raw count  | `p`          |
//!
//! The server should expose an explicit "period completed" flag; until it
//! does, this is the best available reading of its signal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{HabitId, ReminderRecord, ResolvedReminder};
use crate::repository::PeriodMemory;

/// Outcome of the per-habit state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub display_completed_count: u32,
    /// Period number to store, `None` when memory is already current
    pub store: Option<i64>,
}

/// Pure transition: last stored period + fresh record -> display and write.
pub fn decide(stored: Option<i64>, record: &ReminderRecord) -> Decision {
    let period = record.current_period_number;
    let store = (stored != Some(period)).then_some(period);

    let display_completed_count = if !record.is_satisfied() {
        record.period_completed_count
    } else {
        match stored {
            // First sighting: assume the period was just completed
            None => record.times_per_frequency,
            // Rollover since last sighting: new period, nothing done yet
            Some(n) if n != period => 0,
            Some(_) => record.times_per_frequency,
        }
    };

    Decision {
        display_completed_count,
        store,
    }
}

/// Result of resolving one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reminder: ResolvedReminder,
    pub memory_updated: bool,
}

/// Derives the completed count to display for reminder records.
///
/// Reads and writes for one habit are serialized; different habits do not
/// block each other. Storage failures never block rendering: a failed read
/// counts as a first sighting and a failed write is reported as
/// `memory_updated = false`.
pub struct ReminderResolver<M: PeriodMemory> {
    memory: M,
    // One entry per habit id ever resolved, same bound as the memory itself
    habit_locks: Mutex<HashMap<HabitId, Arc<Mutex<()>>>>,
}

impl<M: PeriodMemory> ReminderResolver<M> {
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            habit_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    fn habit_lock(&self, habit_id: HabitId) -> Arc<Mutex<()>> {
        let mut locks = self
            .habit_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(habit_id).or_default().clone()
    }

    /// Resolve one record against the stored period for its habit.
    pub fn resolve(&self, record: ReminderRecord) -> Resolution {
        let habit_id = record.habit_id;
        let lock = self.habit_lock(habit_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let stored = match self.memory.get(habit_id) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(habit_id, error = %e, "period memory read failed, treating as unobserved");
                None
            }
        };

        let decision = decide(stored, &record);

        let memory_updated = match decision.store {
            Some(period) => match self.memory.set(habit_id, period) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(habit_id, period, error = %e, "period memory write failed");
                    false
                }
            },
            None => false,
        };

        tracing::debug!(
            habit_id,
            completed = record.period_completed_count,
            remaining = record.remaining_count,
            period = record.current_period_number,
            ?stored,
            display = decision.display_completed_count,
            memory_updated,
            "resolved reminder"
        );

        Resolution {
            reminder: ResolvedReminder {
                record,
                display_completed_count: decision.display_completed_count,
            },
            memory_updated,
        }
    }

    /// Resolve a fetched batch in order.
    pub fn resolve_all(&self, records: Vec<ReminderRecord>) -> Vec<ResolvedReminder> {
        records
            .into_iter()
            .map(|record| self.resolve(record).reminder)
            .collect()
    }
}
