//! Free-text and attribute filtering for task lists.

use crate::model::category::CategoryId;
use crate::model::task::{Priority, Task};

/// Combined search filter; every constraint is ANDed.
///
/// An empty `query` and `None` attributes impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against title or description.
    pub query: String,
    pub category_id: Option<CategoryId>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.category_id.is_none() && self.priority.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_query(task)
            && self.category_id.map_or(true, |id| task.category_id == Some(id))
            && self.priority.map_or(true, |priority| task.priority == priority)
    }

    /// Returns matching tasks in input order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        if self.is_empty() {
            return tasks.iter().collect();
        }
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    fn matches_query(&self, task: &Task) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskFilter;
    use crate::model::task::{Priority, Task, TaskDraft};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample() -> Vec<Task> {
        let now = Utc::now();
        let mut groceries = TaskDraft::titled("Buy groceries");
        groceries.description = "Milk and EGGS".to_string();
        groceries.priority = Priority::Low;
        let mut report = TaskDraft::titled("Quarterly report");
        report.priority = Priority::High;
        vec![
            Task::from_draft(groceries, now).unwrap(),
            Task::from_draft(report, now).unwrap(),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let tasks = sample();
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&tasks).len(), 2);
    }

    #[test]
    fn query_matches_title_or_description_case_insensitively() {
        let tasks = sample();
        let by_description = TaskFilter {
            query: "eggs".to_string(),
            ..TaskFilter::default()
        };
        assert_eq!(by_description.apply(&tasks)[0].title, "Buy groceries");

        let by_title = TaskFilter {
            query: "REPORT".to_string(),
            ..TaskFilter::default()
        };
        assert_eq!(by_title.apply(&tasks)[0].title, "Quarterly report");
    }

    #[test]
    fn constraints_are_combined_with_and() {
        let mut tasks = sample();
        let home = Uuid::new_v4();
        tasks[0].category_id = Some(home);

        let filter = TaskFilter {
            query: "buy".to_string(),
            category_id: Some(home),
            priority: Some(Priority::High),
        };
        assert!(filter.apply(&tasks).is_empty());

        let filter = TaskFilter {
            priority: Some(Priority::Low),
            ..filter
        };
        assert_eq!(filter.apply(&tasks).len(), 1);
    }
}
