//! Reminder feed: fetch, normalize and resolve reminders for display.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{ApiError, HabitService};
use crate::domain::{HabitId, ResolvedReminder};
use crate::repository::PeriodMemory;
use crate::resolver::ReminderResolver;
use crate::session::AuthSession;

pub struct ReminderFeed<M: PeriodMemory> {
    habits: Arc<dyn HabitService>,
    session: Arc<AuthSession>,
    resolver: ReminderResolver<M>,
    latest: RwLock<Vec<ResolvedReminder>>,
}

impl<M: PeriodMemory> ReminderFeed<M> {
    pub fn new(habits: Arc<dyn HabitService>, session: Arc<AuthSession>, memory: M) -> Self {
        Self {
            habits,
            session,
            resolver: ReminderResolver::new(memory),
            latest: RwLock::new(Vec::new()),
        }
    }

    pub fn resolver(&self) -> &ReminderResolver<M> {
        &self.resolver
    }

    /// Fetch reminders for the logged-in user and resolve their display
    /// counts. The resolved set replaces the previous one.
    pub async fn fetch(&self) -> Result<Vec<ResolvedReminder>, ApiError> {
        let habits = self.habits.clone();
        let records = self
            .session
            .call(|token| {
                let habits = habits.clone();
                async move { habits.get_reminders(&token).await }
            })
            .await?;

        let resolved = self.resolver.resolve_all(records);
        tracing::info!(count = resolved.len(), "reminders resolved");
        *self.latest.write().await = resolved.clone();
        Ok(resolved)
    }

    /// Reminder for one habit from the last fetch
    pub async fn reminder_for(&self, habit_id: HabitId) -> Option<ResolvedReminder> {
        self.latest
            .read()
            .await
            .iter()
            .find(|r| r.habit_id() == habit_id)
            .cloned()
    }

    pub async fn latest(&self) -> Vec<ResolvedReminder> {
        self.latest.read().await.clone()
    }
}
