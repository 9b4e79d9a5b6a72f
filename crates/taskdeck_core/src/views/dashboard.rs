//! Dashboard summary projection.

use crate::model::category::Category;
use crate::model::task::Task;
use crate::views::derive::{stats, TaskStats};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

/// Maximum number of tasks shown in each dashboard list.
pub const DASHBOARD_LIST_LIMIT: usize = 5;
/// Horizon of the "upcoming" list.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount<'a> {
    pub category: &'a Category,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub stats: TaskStats,
    /// Tasks whose due date is on today's calendar day, completed or not.
    pub due_today: Vec<&'a Task>,
    /// Tasks due after `now` and at most `UPCOMING_WINDOW_DAYS` ahead.
    pub upcoming: Vec<&'a Task>,
    /// Most recently created tasks, newest first.
    pub recent: Vec<&'a Task>,
    /// One entry per category, in category list order.
    pub category_counts: Vec<CategoryCount<'a>>,
}

/// Builds the dashboard for `tasks` as seen at `now`.
pub fn dashboard<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    categories: &'a [Category],
    now: &DateTime<Tz>,
) -> DashboardSummary<'a> {
    let now_utc = now.with_timezone(&Utc);
    let horizon = now_utc + Duration::days(UPCOMING_WINDOW_DAYS);
    let today = now.date_naive();

    let due_today = tasks
        .iter()
        .filter(|task| {
            task.due_date
                .is_some_and(|due| due.with_timezone(&now.timezone()).date_naive() == today)
        })
        .take(DASHBOARD_LIST_LIMIT)
        .collect();

    let upcoming = tasks
        .iter()
        .filter(|task| task.due_date.is_some_and(|due| due > now_utc && due <= horizon))
        .take(DASHBOARD_LIST_LIMIT)
        .collect();

    let mut recent: Vec<&Task> = tasks.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(DASHBOARD_LIST_LIMIT);

    let category_counts = categories
        .iter()
        .map(|category| CategoryCount {
            category,
            task_count: tasks
                .iter()
                .filter(|task| task.category_id == Some(category.id))
                .count(),
        })
        .collect();

    DashboardSummary {
        stats: stats(tasks, now),
        due_today,
        upcoming,
        recent,
        category_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::{dashboard, DASHBOARD_LIST_LIMIT};
    use crate::model::category::{Category, CategoryDraft};
    use crate::model::task::{Task, TaskDraft};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn recent_is_newest_first_and_capped() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let tasks: Vec<Task> = (0..7)
            .map(|i| {
                Task::from_draft(TaskDraft::titled(format!("t{i}")), base + Duration::minutes(i))
                    .unwrap()
            })
            .collect();

        let summary = dashboard(&tasks, &[], &base);
        assert_eq!(summary.recent.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(summary.recent[0].title, "t6");
        assert_eq!(summary.recent[4].title, "t2");
        assert_eq!(summary.stats.total, 7);
    }

    #[test]
    fn upcoming_excludes_past_and_beyond_a_week() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let due = |offset: Duration, title: &str| {
            let mut draft = TaskDraft::titled(title);
            draft.due_date = Some(now + offset);
            Task::from_draft(draft, now).unwrap()
        };
        let tasks = vec![
            due(Duration::hours(-1), "past"),
            due(Duration::hours(3), "later today"),
            due(Duration::days(7), "edge"),
            due(Duration::days(8), "too far"),
        ];

        let summary = dashboard(&tasks, &[], &now);
        let upcoming: Vec<&str> = summary.upcoming.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(upcoming, vec!["later today", "edge"]);
        let today: Vec<&str> = summary.due_today.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(today, vec!["past", "later today"]);
    }

    #[test]
    fn category_counts_follow_category_order() {
        let now = Utc::now();
        let work = Category::from_draft(CategoryDraft::named("Work"), "#FF6B6B", now).unwrap();
        let home = Category::from_draft(CategoryDraft::named("Home"), "#4ECDC4", now).unwrap();
        let mut task = Task::from_draft(TaskDraft::titled("deploy"), now).unwrap();
        task.category_id = Some(home.id);
        let tasks = vec![task];
        let categories = vec![work, home];

        let summary = dashboard(&tasks, &categories, &now);
        assert_eq!(summary.category_counts[0].task_count, 0);
        assert_eq!(summary.category_counts[1].task_count, 1);
        assert_eq!(summary.category_counts[1].category.name, "Home");
    }
}
