//! Habit list search, sort and pagination.

use serde::{Deserialize, Serialize};

use crate::domain::Habit;

pub const HABITS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Newest first (higher id = created later)
    #[default]
    DateDesc,
    DateAsc,
    NameAsc,
    NameDesc,
    /// Keeps server order
    ProgressDesc,
    /// Keeps server order
    StreakDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::DateDesc => "date-desc",
            SortOption::DateAsc => "date-asc",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::ProgressDesc => "progress-desc",
            SortOption::StreakDesc => "streak-desc",
        }
    }

    /// Unknown values fall back to the default order
    pub fn from_str(s: &str) -> Self {
        match s {
            "date-asc" => SortOption::DateAsc,
            "name-asc" => SortOption::NameAsc,
            "name-desc" => SortOption::NameDesc,
            "progress-desc" => SortOption::ProgressDesc,
            "streak-desc" => SortOption::StreakDesc,
            _ => SortOption::DateDesc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HabitQuery {
    pub search: Option<String>,
    pub sort: SortOption,
    /// 1-based
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitPage {
    pub items: Vec<Habit>,
    pub page: usize,
    pub total_pages: usize,
    /// Habits matching the search
    pub matched: usize,
    /// Habits before filtering
    pub total: usize,
}

impl HabitQuery {
    pub fn apply(&self, habits: &[Habit]) -> HabitPage {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<Habit> = habits
            .iter()
            .filter(|h| match &needle {
                Some(needle) => h.description.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        // sort_by is stable, so ties keep server order
        match self.sort {
            SortOption::DateDesc => matched.sort_by(|a, b| b.id.cmp(&a.id)),
            SortOption::DateAsc => matched.sort_by(|a, b| a.id.cmp(&b.id)),
            SortOption::NameAsc => matched.sort_by(|a, b| compare_names(&a.description, &b.description)),
            SortOption::NameDesc => matched.sort_by(|a, b| compare_names(&b.description, &a.description)),
            SortOption::ProgressDesc | SortOption::StreakDesc => {}
        }

        let total_pages = matched.len().div_ceil(HABITS_PER_PAGE);
        let page = self.page.clamp(1, total_pages.max(1));
        let items = matched
            .iter()
            .skip((page - 1) * HABITS_PER_PAGE)
            .take(HABITS_PER_PAGE)
            .cloned()
            .collect();

        HabitPage {
            items,
            page,
            total_pages,
            matched: matched.len(),
            total: habits.len(),
        }
    }
}

fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FrequencyType, GoalSpec};

    fn habits(names: &[&str]) -> Vec<Habit> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Habit::new(
                    i as i64 + 1,
                    name.to_string(),
                    GoalSpec::new(FrequencyType::Daily, 1, 30).into_goal(),
                )
            })
            .collect()
    }

    fn ids(page: &HabitPage) -> Vec<i64> {
        page.items.iter().map(|h| h.id).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let page = HabitQuery { page: 1, ..Default::default() }.apply(&habits(&["a", "b", "c"]));
        assert_eq!(ids(&page), vec![3, 2, 1]);
    }

    #[test]
    fn test_name_sorts_ignore_case() {
        let list = habits(&["walk", "Bike", "apple"]);
        let asc = HabitQuery { sort: SortOption::NameAsc, page: 1, ..Default::default() }.apply(&list);
        assert_eq!(ids(&asc), vec![3, 2, 1]);
        let desc = HabitQuery { sort: SortOption::NameDesc, page: 1, ..Default::default() }.apply(&list);
        assert_eq!(ids(&desc), vec![1, 2, 3]);
    }

    #[test]
    fn test_progress_sort_keeps_server_order() {
        let list = habits(&["x", "y", "z"]);
        let page = HabitQuery { sort: SortOption::StreakDesc, page: 1, ..Default::default() }.apply(&list);
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let list = habits(&["Morning run", "Evening READ", "Read news"]);
        let page = HabitQuery {
            search: Some("  read ".to_string()),
            sort: SortOption::DateAsc,
            page: 1,
        }
        .apply(&list);
        assert_eq!(ids(&page), vec![2, 3]);
        assert_eq!(page.matched, 2);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_pagination() {
        let names: Vec<String> = (0..23).map(|i| format!("habit {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let list = habits(&refs);

        let third = HabitQuery { sort: SortOption::DateAsc, page: 3, ..Default::default() }.apply(&list);
        assert_eq!(third.total_pages, 3);
        assert_eq!(ids(&third), vec![21, 22, 23]);

        let beyond = HabitQuery { sort: SortOption::DateAsc, page: 9, ..Default::default() }.apply(&list);
        assert_eq!(beyond.page, 3);

        let empty = HabitQuery { page: 0, ..Default::default() }.apply(&[]);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_sort_option_strings() {
        assert_eq!(SortOption::from_str("name-desc"), SortOption::NameDesc);
        assert_eq!(SortOption::from_str("bogus"), SortOption::DateDesc);
        assert_eq!(
            serde_json::to_string(&SortOption::ProgressDesc).unwrap(),
            "\"progress-desc\""
        );
    }
}
