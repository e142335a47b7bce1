//! Reminder Records
//!
//! The reminder endpoint has returned several shapes over its lifetime: nested
//! `habit`/`goal` objects, flat snake_case fields, flat camelCase fields, and
//! different envelope keys. Everything is mapped into [`ReminderRecord`] here,
//! with defaults for anything missing, so the rest of the crate only sees one
//! strict shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::habit::HabitId;
use super::habit::FrequencyType;

/// Per-habit reminder as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    pub habit_id: HabitId,
    pub description: String,
    pub frequency_type: FrequencyType,
    /// Target count for the current period (always >= 1 after normalization)
    pub times_per_frequency: u32,
    pub period_completed_count: u32,
    /// Reported by the server, not derived from the other two counts
    pub remaining_count: u32,
    pub current_period_number: i64,
}

impl ReminderRecord {
    /// The server's ambiguous "0 done / 0 left" signal. It is sent both right
    /// after a period's target is met and at the start of a fresh period.
    pub fn is_satisfied(&self) -> bool {
        self.period_completed_count == 0 && self.remaining_count == 0 && self.times_per_frequency > 0
    }

    /// Map one loosely shaped reminder object into a record.
    pub fn from_value(value: &Value) -> Self {
        let habit_id = first_int(value, &[&["habit", "id"], &["habit_id"], &["habitId"]]).unwrap_or(0);

        let description = first_str(value, &[&["habit", "description"], &["description"]])
            .unwrap_or_default();

        let frequency_type = first_str(
            value,
            &[&["goal", "frequency_type"], &["frequency_type"], &["frequencyType"]],
        )
        .map(|s| FrequencyType::from_str(&s))
        .unwrap_or_default();

        let times_per_frequency = first_int(
            value,
            &[&["goal", "times_per_frequency"], &["times_per_frequency"], &["timesPerFrequency"]],
        )
        .filter(|n| *n > 0)
        .map(clamp_count)
        .unwrap_or(1);

        let period_completed_count = first_int(
            value,
            &[&["current_period_completed_times"], &["currentPeriodCompletedTimes"]],
        )
        .map(clamp_count)
        .unwrap_or(0);

        let remaining_count = first_int(
            value,
            &[&["remaining_completion_count"], &["remainingCompletionCount"]],
        )
        .map(clamp_count)
        .unwrap_or(0);

        let current_period_number =
            first_int(value, &[&["current_period_number"], &["currentPeriodNumber"]]).unwrap_or(1);

        Self {
            habit_id,
            description,
            frequency_type,
            times_per_frequency,
            period_completed_count,
            remaining_count,
            current_period_number,
        }
    }
}

/// A record plus the completed count that is safe to show for this period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReminder {
    #[serde(flatten)]
    pub record: ReminderRecord,
    pub display_completed_count: u32,
}

impl ResolvedReminder {
    pub fn habit_id(&self) -> HabitId {
        self.record.habit_id
    }
}

/// Extract the reminder list from a `GET /tracker/reminder` payload.
///
/// Accepts a bare array or an array under `reminder`, `reminders` or `data`.
/// Anything else, `null` included, is an empty list.
pub fn normalize_reminders(payload: &Value) -> Vec<ReminderRecord> {
    let items = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["reminder", "reminders", "data"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    items
        .map(|items| items.iter().map(ReminderRecord::from_value).collect())
        .unwrap_or_default()
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .filter(|v| !v.is_null())
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn first_int(value: &Value, paths: &[&[&str]]) -> Option<i64> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(as_int))
}

fn first_str(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(Value::as_str))
        .map(str::to_string)
}

fn clamp_count(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_shape() {
        let payload = json!({
            "reminders": [{
                "habit": {"id": 7, "description": "Stretch"},
                "goal": {"frequency_type": "weekly", "times_per_frequency": 3},
                "current_period_completed_times": 2,
                "remaining_completion_count": 1,
                "current_period_number": 12
            }]
        });

        let records = normalize_reminders(&payload);
        assert_eq!(
            records,
            vec![ReminderRecord {
                habit_id: 7,
                description: "Stretch".to_string(),
                frequency_type: FrequencyType::Weekly,
                times_per_frequency: 3,
                period_completed_count: 2,
                remaining_count: 1,
                current_period_number: 12,
            }]
        );
    }

    #[test]
    fn test_flat_snake_and_camel_shapes() {
        let payload = json!([
            {"habit_id": 1, "description": "A", "times_per_frequency": 2, "current_period_number": 3},
            {"habitId": 2, "frequencyType": "monthly", "timesPerFrequency": 4,
             "currentPeriodCompletedTimes": 1, "remainingCompletionCount": 3, "currentPeriodNumber": 9}
        ]);

        let records = normalize_reminders(&payload);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].habit_id, 1);
        assert_eq!(records[0].times_per_frequency, 2);
        assert_eq!(records[0].current_period_number, 3);
        assert_eq!(records[1].habit_id, 2);
        assert_eq!(records[1].frequency_type, FrequencyType::Monthly);
        assert_eq!(records[1].period_completed_count, 1);
        assert_eq!(records[1].remaining_count, 3);
    }

    #[test]
    fn test_envelopes() {
        let item = json!({"habit_id": 5});
        for payload in [
            json!({"reminder": [item.clone()]}),
            json!({"reminders": [item.clone()]}),
            json!({"data": [item.clone()]}),
            json!([item.clone()]),
        ] {
            assert_eq!(normalize_reminders(&payload).len(), 1, "payload {payload}");
        }

        assert!(normalize_reminders(&Value::Null).is_empty());
        assert!(normalize_reminders(&json!({"reminders": null})).is_empty());
        assert!(normalize_reminders(&json!("nope")).is_empty());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = ReminderRecord::from_value(&json!({}));
        assert_eq!(record.habit_id, 0);
        assert_eq!(record.description, "");
        assert_eq!(record.frequency_type, FrequencyType::Daily);
        assert_eq!(record.times_per_frequency, 1);
        assert_eq!(record.period_completed_count, 0);
        assert_eq!(record.remaining_count, 0);
        assert_eq!(record.current_period_number, 1);
        assert!(record.is_satisfied());
    }

    #[test]
    fn test_zero_target_and_negative_counts() {
        let record = ReminderRecord::from_value(&json!({
            "habit_id": 3,
            "times_per_frequency": 0,
            "current_period_completed_times": -2,
            "remaining_completion_count": "4",
            "current_period_number": null
        }));
        assert_eq!(record.times_per_frequency, 1);
        assert_eq!(record.period_completed_count, 0);
        assert_eq!(record.remaining_count, 4);
        assert_eq!(record.current_period_number, 1);
    }

    #[test]
    fn test_nested_takes_priority_over_flat() {
        let record = ReminderRecord::from_value(&json!({
            "habit": {"id": 10},
            "habit_id": 99,
        }));
        assert_eq!(record.habit_id, 10);
    }

    #[test]
    fn test_resolved_reminder_serializes_flat() {
        let resolved = ResolvedReminder {
            record: ReminderRecord::from_value(&json!({"habit_id": 8})),
            display_completed_count: 1,
        };
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["habitId"], 8);
        assert_eq!(value["displayCompletedCount"], 1);
    }
}
