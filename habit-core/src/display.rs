//! Display Formatting
//!
//! Text shown to the user for habits, progress and reminders.

use crate::domain::{FrequencyType, Goal, Habit, Progress, ResolvedReminder};

pub fn frequency_label(frequency: FrequencyType) -> &'static str {
    match frequency {
        FrequencyType::Daily => "ежедневно",
        FrequencyType::Weekly => "еженедельно",
        FrequencyType::Monthly => "ежемесячно",
    }
}

/// "3 раз еженедельно"
pub fn goal_summary(goal: &Goal) -> String {
    format!(
        "{} раз {}",
        goal.times_per_frequency,
        frequency_label(goal.frequency_type)
    )
}

/// Rounded percentage capped at 100; 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = (f64::from(part) / f64::from(whole) * 100.0).round();
    pct.min(100.0) as u32
}

/// Everything the progress block of a habit card shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitProgressView {
    pub total_completed: u32,
    pub total_periods: u32,
    pub completion_percentage: u32,
    pub current_times: u32,
    pub times: u32,
    pub current_period_percentage: u32,
    pub current_streak: u32,
}

impl HabitProgressView {
    /// `current_times` is the resolved display count from the reminder feed,
    /// 0 when the habit has no reminder.
    pub fn new(habit: &Habit, progress: Option<&Progress>, current_times: u32) -> Self {
        let stats = progress.map(Progress::stats).unwrap_or_default();
        let total_periods = if habit.goal.total_tracking_periods > 0 {
            habit.goal.total_tracking_periods
        } else {
            progress
                .and_then(|p| p.goal.as_ref())
                .map(|g| g.total_tracking_periods)
                .unwrap_or(0)
        };
        let times = habit.goal.times_per_frequency;

        Self {
            total_completed: stats.total_completed_periods,
            total_periods,
            completion_percentage: percentage(stats.total_completed_periods, total_periods),
            current_times,
            times,
            current_period_percentage: percentage(current_times, times),
            current_streak: stats.current_streak,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Общий прогресс: {}%", self.completion_percentage),
            format!("{} из {} периодов", self.total_completed, self.total_periods),
            format!("За текущий период: {}%", self.current_period_percentage),
            format!(
                "Выполнено за текущий период: {} из {} раз",
                self.current_times, self.times
            ),
        ];
        if self.current_streak > 0 {
            lines.push(format!("Серия: {}", self.current_streak));
        }
        lines
    }
}

pub fn remaining_actions(reminder: &ResolvedReminder) -> u32 {
    reminder.record.remaining_count
}

/// "Выполнено: 2 из 3"
pub fn reminder_line(reminder: &ResolvedReminder) -> String {
    format!(
        "Выполнено: {} из {}",
        reminder.display_completed_count, reminder.record.times_per_frequency
    )
}

pub fn reminder_badge(reminder: &ResolvedReminder) -> String {
    match remaining_actions(reminder) {
        0 => "Выполнено".to_string(),
        n => format!("Осталось: {}", n),
    }
}

/// "Завершена: 05.03.2024 10:20" (UTC), `None` when the stamp is missing or unparsable
pub fn completion_stamp(habit: &Habit) -> Option<String> {
    let at = habit.completed_at.as_ref()?.to_datetime();
    if at.is_none() {
        tracing::warn!(habit_id = habit.id, stamp = ?habit.completed_at, "unparsable completion date");
    }
    at.map(|dt| format!("Завершена: {}", dt.format("%d.%m.%Y %H:%M")))
}

pub const EMPTY_REMINDERS: &str = "Отлично! У вас нет невыполненных привычек сегодня.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionStamp, ProgressData, ReminderRecord};

    fn habit(times: u32, periods: u32) -> Habit {
        Habit::new(
            1,
            "Read".to_string(),
            Goal {
                id: Some(1),
                frequency_type: FrequencyType::Weekly,
                times_per_frequency: times,
                total_tracking_periods: periods,
                is_completed: Some(false),
            },
        )
    }

    fn reminder(display: u32, remaining: u32) -> ResolvedReminder {
        ResolvedReminder {
            record: ReminderRecord {
                habit_id: 1,
                description: "Read".to_string(),
                frequency_type: FrequencyType::Daily,
                times_per_frequency: 3,
                period_completed_count: display,
                remaining_count: remaining,
                current_period_number: 1,
            },
            display_completed_count: display,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 4), 100);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn test_goal_summary() {
        assert_eq!(goal_summary(&habit(3, 10).goal), "3 раз еженедельно");
    }

    #[test]
    fn test_progress_view() {
        let progress = Progress {
            goal: None,
            progress: Some(ProgressData {
                total_completed_periods: 5,
                current_streak: 2,
                ..Default::default()
            }),
            habit: None,
        };
        let view = HabitProgressView::new(&habit(4, 20), Some(&progress), 1);
        assert_eq!(view.completion_percentage, 25);
        assert_eq!(view.current_period_percentage, 25);
        assert_eq!(view.current_streak, 2);
        assert!(view.lines().iter().any(|l| l == "Серия: 2"));
    }

    #[test]
    fn test_progress_view_falls_back_to_progress_goal() {
        let mut goal = habit(1, 8).goal;
        let progress = Progress {
            goal: Some(goal.clone()),
            progress: None,
            habit: None,
        };
        goal.total_tracking_periods = 0;
        let without_periods = Habit::new(1, "Read".to_string(), goal);

        let view = HabitProgressView::new(&without_periods, Some(&progress), 0);
        assert_eq!(view.total_periods, 8);
        assert!(view.lines().iter().all(|l| !l.starts_with("Серия")));
    }

    #[test]
    fn test_reminder_texts() {
        assert_eq!(reminder_line(&reminder(2, 1)), "Выполнено: 2 из 3");
        assert_eq!(reminder_badge(&reminder(2, 1)), "Осталось: 1");
        assert_eq!(reminder_badge(&reminder(3, 0)), "Выполнено");
    }

    #[test]
    fn test_completion_stamp() {
        let mut done = habit(1, 1);
        assert_eq!(completion_stamp(&done), None);

        done.completed_at = Some(CompletionStamp::Text("2024-01-31T23:05:00".to_string()));
        assert_eq!(completion_stamp(&done).as_deref(), Some("Завершена: 31.01.2024 23:05"));

        done.completed_at = Some(CompletionStamp::Text("soon".to_string()));
        assert_eq!(completion_stamp(&done), None);
    }
}
