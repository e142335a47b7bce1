//! SQLite Period Memory
//!
//! SQLite-backed implementation of PeriodMemory.

use rusqlite::{params, OptionalExtension};

use super::db::{lock, SharedConnection};
use super::traits::PeriodMemory;
use crate::domain::{DomainResult, HabitId};

/// SQLite implementation of PeriodMemory
pub struct SqlitePeriodMemory {
    conn: SharedConnection,
}

impl SqlitePeriodMemory {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// All stored entries ordered by habit id
    pub fn entries(&self) -> DomainResult<Vec<(HabitId, i64)>> {
        let conn = lock(&self.conn);
        let mut stmt =
            conn.prepare("SELECT habit_id, period_number FROM habit_periods ORDER BY habit_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

impl PeriodMemory for SqlitePeriodMemory {
    fn get(&self, habit_id: HabitId) -> DomainResult<Option<i64>> {
        let conn = lock(&self.conn);
        let period = conn
            .query_row(
                "SELECT period_number FROM habit_periods WHERE habit_id = ?1",
                params![habit_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(period)
    }

    fn set(&self, habit_id: HabitId, period_number: i64) -> DomainResult<()> {
        let conn = lock(&self.conn);
        conn.execute(
            "INSERT INTO habit_periods (habit_id, period_number, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(habit_id) DO UPDATE SET
                period_number = excluded.period_number,
                updated_at = excluded.updated_at",
            params![habit_id, period_number, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }
}
