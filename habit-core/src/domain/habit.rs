//! Habit Entity
//!
//! A habit with a periodic goal, as returned by the tracker service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{DomainError, DomainResult};

/// Server-assigned habit identifier
pub type HabitId = i64;

/// How often the goal target resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FrequencyType {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FrequencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::Daily => "daily",
            FrequencyType::Weekly => "weekly",
            FrequencyType::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => FrequencyType::Weekly,
            "monthly" => FrequencyType::Monthly,
            _ => FrequencyType::Daily,
        }
    }
}

impl From<String> for FrequencyType {
    fn from(s: String) -> Self {
        FrequencyType::from_str(&s)
    }
}

/// Goal attached to a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frequency_type: FrequencyType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub times_per_frequency: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tracking_periods: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// Goal as sent when creating or updating a habit (no id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub frequency_type: FrequencyType,
    pub times_per_frequency: u32,
    pub total_tracking_periods: u32,
}

impl GoalSpec {
    pub fn new(frequency_type: FrequencyType, times_per_frequency: u32, total_tracking_periods: u32) -> Self {
        Self {
            frequency_type,
            times_per_frequency,
            total_tracking_periods,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.times_per_frequency == 0 {
            return Err(DomainError::InvalidInput(
                "times_per_frequency must be at least 1".to_string(),
            ));
        }
        if self.total_tracking_periods == 0 {
            return Err(DomainError::InvalidInput(
                "total_tracking_periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full goal with no id, used by the mock service
    pub fn into_goal(self) -> Goal {
        Goal {
            id: None,
            frequency_type: self.frequency_type,
            times_per_frequency: self.times_per_frequency,
            total_tracking_periods: self.total_tracking_periods,
            is_completed: Some(false),
        }
    }
}

/// Completion timestamp as sent by the server: ISO-8601 text or an epoch number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionStamp {
    Epoch(i64),
    Text(String),
}

impl CompletionStamp {
    /// Parse into a UTC date-time. Epochs above 9_999_999_999 are milliseconds.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CompletionStamp::Epoch(ts) => from_epoch(*ts),
            CompletionStamp::Text(s) => {
                parse_iso(s).or_else(|| s.trim().parse::<i64>().ok().and_then(from_epoch))
            }
        }
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn from_epoch(ts: i64) -> Option<NaiveDateTime> {
    let millis = if ts > 9_999_999_999 { ts } else { ts.checked_mul(1000)? };
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HabitWire")]
pub struct Habit {
    pub id: HabitId,
    pub description: String,
    pub goal: Goal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<CompletionStamp>,
}

/// Incoming habit; deployments disagree on the completion field name
#[derive(Deserialize)]
struct HabitWire {
    id: HabitId,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    goal: Goal,
    #[serde(default)]
    completed_at: Option<CompletionStamp>,
    #[serde(default, rename = "completedAt")]
    completed_at_camel: Option<CompletionStamp>,
    #[serde(default)]
    finished_at: Option<CompletionStamp>,
    #[serde(default, rename = "finishedAt")]
    finished_at_camel: Option<CompletionStamp>,
}

impl From<HabitWire> for Habit {
    fn from(wire: HabitWire) -> Self {
        // First non-empty stamp wins
        let completed_at = [
            wire.completed_at,
            wire.completed_at_camel,
            wire.finished_at,
            wire.finished_at_camel,
        ]
        .into_iter()
        .flatten()
        .find(|stamp| !matches!(stamp, CompletionStamp::Text(s) if s.trim().is_empty()));

        Self {
            id: wire.id,
            description: wire.description,
            goal: wire.goal,
            completed_at,
        }
    }
}

impl Habit {
    pub fn new(id: HabitId, description: String, goal: Goal) -> Self {
        Self {
            id,
            description,
            goal,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.goal.is_completed.unwrap_or(false) || self.completed_at.is_some()
    }
}

/// `GET /tracker/habits` and `GET /tracker/habits/completed` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitListResponse {
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub habits: Vec<Habit>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub description: String,
    pub goal: GoalSpec,
}

impl CreateHabitRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.description.trim().is_empty() {
            return Err(DomainError::InvalidInput("description is empty".to_string()));
        }
        self.goal.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateHabitRequest {
    pub id: HabitId,
    pub description: String,
    pub goal: GoalSpec,
}

impl UpdateHabitRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.description.trim().is_empty() {
            return Err(DomainError::InvalidInput("description is empty".to_string()));
        }
        self.goal.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_type_parsing() {
        assert_eq!(FrequencyType::from_str("weekly"), FrequencyType::Weekly);
        assert_eq!(FrequencyType::from_str("MONTHLY"), FrequencyType::Monthly);
        assert_eq!(FrequencyType::from_str("yearly"), FrequencyType::Daily);
        assert_eq!(FrequencyType::Weekly.as_str(), "weekly");
    }

    #[test]
    fn test_habit_list_null_habits() {
        let list: HabitListResponse =
            serde_json::from_str(r#"{"username":"anna","habits":null}"#).unwrap();
        assert_eq!(list.username, "anna");
        assert!(list.habits.is_empty());
    }

    #[test]
    fn test_completed_at_aliases() {
        let json = r#"{
            "id": 4,
            "description": "Run",
            "goal": {"frequency_type": "daily", "times_per_frequency": 2, "total_tracking_periods": 90},
            "finishedAt": "2024-03-05T10:20:00Z"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        let at = habit.completed_at.unwrap().to_datetime().unwrap();
        assert_eq!(at.format("%d.%m.%Y %H:%M").to_string(), "05.03.2024 10:20");
    }

    #[test]
    fn test_first_completion_field_wins() {
        let json = r#"{
            "id": 5,
            "description": "Swim",
            "goal": {"frequency_type": "weekly", "times_per_frequency": 1, "total_tracking_periods": 4},
            "completed_at": null,
            "completedAt": "",
            "finished_at": "2024-01-02T08:00:00Z",
            "finishedAt": "2025-06-07T09:00:00Z"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        let at = habit.completed_at.unwrap().to_datetime().unwrap();
        assert_eq!(at.format("%Y-%m-%d").to_string(), "2024-01-02");

        let both = r#"{"id": 6, "goal": {}, "completed_at": 1700000000, "completedAt": 1}"#;
        let habit: Habit = serde_json::from_str(both).unwrap();
        assert_eq!(habit.completed_at, Some(CompletionStamp::Epoch(1_700_000_000)));
    }

    #[test]
    fn test_null_goal_fields_take_defaults() {
        let list: HabitListResponse = serde_json::from_str(
            r#"{"username":"anna","habits":[{"id":1,"description":null,
                "goal":{"frequency_type":null,"times_per_frequency":null,"total_tracking_periods":3}}]}"#,
        )
        .unwrap();
        let habit = &list.habits[0];
        assert_eq!(habit.description, "");
        assert_eq!(habit.goal.frequency_type, FrequencyType::Daily);
        assert_eq!(habit.goal.times_per_frequency, 0);
        assert_eq!(habit.goal.total_tracking_periods, 3);
    }

    #[test]
    fn test_completion_stamp_epochs() {
        let secs = CompletionStamp::Epoch(1_700_000_000).to_datetime().unwrap();
        let millis = CompletionStamp::Epoch(1_700_000_000_000).to_datetime().unwrap();
        assert_eq!(secs, millis);

        let text = CompletionStamp::Text("1700000000".to_string()).to_datetime().unwrap();
        assert_eq!(text, secs);

        assert!(CompletionStamp::Text("yesterday".to_string()).to_datetime().is_none());
    }

    #[test]
    fn test_unknown_frequency_reads_as_daily() {
        let goal: Goal = serde_json::from_str(
            r#"{"frequency_type":"hourly","times_per_frequency":1,"total_tracking_periods":3}"#,
        )
        .unwrap();
        assert_eq!(goal.frequency_type, FrequencyType::Daily);
    }

    #[test]
    fn test_create_request_validation() {
        let ok = CreateHabitRequest {
            description: "Read".to_string(),
            goal: GoalSpec::new(FrequencyType::Daily, 1, 30),
        };
        assert!(ok.validate().is_ok());

        let blank = CreateHabitRequest {
            description: "  ".to_string(),
            ..ok.clone()
        };
        assert!(matches!(blank.validate(), Err(DomainError::InvalidInput(_))));

        let zero = CreateHabitRequest {
            goal: GoalSpec::new(FrequencyType::Weekly, 0, 30),
            ..ok
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_request_serializes_goal_without_id() {
        let req = CreateHabitRequest {
            description: "Meditate".to_string(),
            goal: GoalSpec::new(FrequencyType::Weekly, 3, 12),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["goal"]["frequency_type"], "weekly");
        assert!(value["goal"].get("id").is_none());
    }
}
