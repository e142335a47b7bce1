//! Habit list and CRUD commands

use anyhow::{Context, Result};
use habit_core::display::{completion_stamp, goal_summary, HabitProgressView};
use habit_core::domain::{
    CreateHabitRequest, FrequencyType, GoalSpec, Habit, HabitId, UpdateHabitRequest,
};
use habit_core::{HabitQuery, SortOption};

use crate::app::AppState;

/// Options for `habits list`
#[derive(Debug, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: usize,
}

fn habit_header(habit: &Habit) -> String {
    format!("#{} {}\n   Цель: {}", habit.id, habit.description, goal_summary(&habit.goal))
}

pub async fn list(state: &AppState, options: ListOptions) -> Result<String> {
    let sort = match &options.sort {
        Some(value) => {
            let sort = SortOption::from_str(value);
            state.set_sort_preference(sort);
            sort
        }
        None => state.sort_preference(),
    };

    let habits = state.services.habits.clone();
    let list = state
        .session
        .call(|token| {
            let habits = habits.clone();
            async move { habits.list_habits(&token).await }
        })
        .await
        .context("Failed to load habits")?;

    // Reminder counts are optional decoration for the list
    if let Err(e) = state.feed.fetch().await {
        tracing::warn!(error = %e, "reminders unavailable for habit list");
    }

    let page = HabitQuery {
        search: options.search,
        sort,
        page: options.page,
    }
    .apply(&list.habits);

    if page.items.is_empty() {
        return Ok(if page.total == 0 {
            "У вас пока нет привычек".to_string()
        } else {
            "Ничего не найдено".to_string()
        });
    }

    let mut out = Vec::new();
    for habit in &page.items {
        let id = habit.id;
        let progress = match state
            .session
            .call(|token| {
                let habits = habits.clone();
                async move { habits.get_progress(id, &token).await }
            })
            .await
        {
            Ok(progress) => Some(progress),
            Err(e) => {
                tracing::warn!(habit_id = id, error = %e, "progress unavailable");
                None
            }
        };
        let current = state
            .feed
            .reminder_for(id)
            .await
            .map(|r| r.display_completed_count)
            .unwrap_or(0);

        let view = HabitProgressView::new(habit, progress.as_ref(), current);
        out.push(habit_header(habit));
        out.extend(view.lines().into_iter().map(|line| format!("   {}", line)));
    }
    out.push(format!(
        "Страница {} из {} (найдено {} из {}, сортировка {})",
        page.page,
        page.total_pages,
        page.matched,
        page.total,
        sort.as_str()
    ));
    Ok(out.join("\n"))
}

pub async fn completed(state: &AppState) -> Result<String> {
    let habits = state.services.habits.clone();
    let list = state
        .session
        .call(|token| {
            let habits = habits.clone();
            async move { habits.list_completed_habits(&token).await }
        })
        .await
        .context("Failed to load completed habits")?;

    if list.habits.is_empty() {
        return Ok("Нет завершённых привычек".to_string());
    }

    let lines: Vec<String> = list
        .habits
        .iter()
        .map(|habit| match completion_stamp(habit) {
            Some(stamp) => format!("{}\n   {}", habit_header(habit), stamp),
            None => habit_header(habit),
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Goal fields shared by create and update
#[derive(Debug, Clone)]
pub struct GoalArgs {
    pub frequency: String,
    pub times: u32,
    pub periods: u32,
}

impl GoalArgs {
    fn spec(&self) -> GoalSpec {
        GoalSpec::new(FrequencyType::from_str(&self.frequency), self.times, self.periods)
    }
}

pub async fn create(state: &AppState, description: String, goal: GoalArgs) -> Result<String> {
    let request = CreateHabitRequest {
        description,
        goal: goal.spec(),
    };
    let habits = state.services.habits.clone();
    let message = state
        .session
        .call(|token| {
            let habits = habits.clone();
            let request = request.clone();
            async move { habits.create_habit(&request, &token).await }
        })
        .await
        .context("Failed to create habit")?;
    Ok(message)
}

pub async fn update(state: &AppState, id: HabitId, description: String, goal: GoalArgs) -> Result<String> {
    let request = UpdateHabitRequest {
        id,
        description,
        goal: goal.spec(),
    };
    let habits = state.services.habits.clone();
    let message = state
        .session
        .call(|token| {
            let habits = habits.clone();
            let request = request.clone();
            async move { habits.update_habit(&request, &token).await }
        })
        .await
        .context("Failed to update habit")?;
    Ok(message)
}

pub async fn delete(state: &AppState, id: HabitId) -> Result<String> {
    let habits = state.services.habits.clone();
    let message = state
        .session
        .call(|token| {
            let habits = habits.clone();
            async move { habits.delete_habit(id, &token).await }
        })
        .await
        .context("Failed to delete habit")?;
    Ok(message)
}
