//! Subset and statistics derivations.

use crate::model::category::CategoryId;
use crate::model::task::Task;
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Percentage in `0..=100`, rounded half up; `0` for an empty list.
    pub completion_rate: u32,
}

pub fn by_category(tasks: &[Task], category_id: CategoryId) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.category_id == Some(category_id))
        .collect()
}

pub fn by_completion(tasks: &[Task], completed: bool) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.completed == completed)
        .collect()
}

pub fn overdue<'a, Tz: TimeZone>(tasks: &'a [Task], now: &DateTime<Tz>) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.is_overdue(now)).collect()
}

pub fn due_today<'a, Tz: TimeZone>(tasks: &'a [Task], now: &DateTime<Tz>) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.is_due_today(now)).collect()
}

pub fn due_soon<'a, Tz: TimeZone>(tasks: &'a [Task], now: &DateTime<Tz>) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.is_due_soon(now)).collect()
}

pub fn stats<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let overdue = tasks.iter().filter(|task| task.is_overdue(now)).count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        overdue,
        completion_rate: completion_rate(completed, total),
    }
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(completed / total * 100) with halves rounded up, in integers.
    ((completed * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::{by_category, by_completion, completion_rate, due_soon, due_today, overdue, stats};
    use crate::model::task::{Task, TaskDraft};
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    fn task(now: DateTime<Utc>, title: &str, due_in: Option<Duration>, completed: bool) -> Task {
        let mut draft = TaskDraft::titled(title);
        draft.due_date = due_in.map(|offset| now + offset);
        draft.completed = completed;
        Task::from_draft(draft, now).unwrap()
    }

    #[test]
    fn stats_on_four_tasks_with_one_completed() {
        let now = Utc::now();
        let tasks = vec![
            task(now, "a", None, true),
            task(now, "b", None, false),
            task(now, "c", None, false),
            task(now, "d", Some(Duration::days(-1)), false),
        ];
        let stats = stats(&tasks, &now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completion_rate, 25);
    }

    #[test]
    fn completion_rate_rounds_half_up_and_handles_empty() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(5, 5), 100);
    }

    #[test]
    fn due_filters_preserve_input_order() {
        let now = Utc::now();
        let tasks = vec![
            task(now, "late", Some(Duration::days(-2)), false),
            task(now, "soon", Some(Duration::days(2)), false),
            task(now, "done late", Some(Duration::days(-2)), true),
            task(now, "someday", None, false),
            task(now, "far", Some(Duration::days(10)), false),
        ];

        let titles = |list: Vec<&Task>| list.iter().map(|t| t.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(overdue(&tasks, &now)), vec!["late"]);
        assert_eq!(titles(due_soon(&tasks, &now)), vec!["soon"]);
        assert!(due_today(&tasks, &now).is_empty());
    }

    #[test]
    fn category_and_completion_filters() {
        let now = Utc::now();
        let work = Uuid::new_v4();
        let mut tasks = vec![
            task(now, "a", None, false),
            task(now, "b", None, true),
            task(now, "c", None, false),
        ];
        tasks[0].category_id = Some(work);
        tasks[1].category_id = Some(work);

        assert_eq!(by_category(&tasks, work).len(), 2);
        assert_eq!(by_category(&tasks, Uuid::new_v4()).len(), 0);
        assert_eq!(by_completion(&tasks, true).len(), 1);
        assert_eq!(by_completion(&tasks, false).len(), 2);
    }
}
