//! Progress statistics for a single habit (`GET /tracker/progress/{id}`).

use serde::{Deserialize, Serialize};

use super::habit::HabitId;
use super::habit::Goal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    #[serde(default)]
    pub total_completed_periods: u32,
    #[serde(default)]
    pub total_completed_times: u32,
    #[serde(default)]
    pub total_skipped_periods: u32,
    #[serde(default)]
    pub most_longest_streak: u32,
    #[serde(default)]
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRef {
    pub id: HabitId,
    #[serde(default)]
    pub description: String,
}

/// Every part is optional; the server omits sections it has no data for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit: Option<HabitRef>,
}

impl Progress {
    pub fn stats(&self) -> ProgressData {
        self.progress.clone().unwrap_or_default()
    }
}
