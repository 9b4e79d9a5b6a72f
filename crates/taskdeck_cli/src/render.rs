//! Text and JSON output for the CLI.

use crate::commands::CliResult;
use serde::Serialize;
use taskdeck_core::{
    Category, CategoryStore, DashboardSummary, KeyValueRepository, Settings, Task, TaskStats,
};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `[x] <id> <title> (<priority>, due <date>, <category>)`
pub fn task_line<R: KeyValueRepository>(task: &Task, categories: &CategoryStore<R>) -> String {
    let mark = if task.completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|due| format!(", due {}", due.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        "[{mark}] {} {} ({}{due}, {})",
        task.id,
        task.title,
        task.priority,
        categories.name_of(task.category_id)
    )
}

pub fn category_line(category: &Category, task_count: usize) -> String {
    format!(
        "{} {} {} ({task_count} tasks)",
        category.id, category.color, category.name
    )
}

pub fn print_stats(stats: &TaskStats) {
    println!("total:           {}", stats.total);
    println!("completed:       {}", stats.completed);
    println!("pending:         {}", stats.pending);
    println!("overdue:         {}", stats.overdue);
    println!("completion rate: {}%", stats.completion_rate);
}

pub fn settings_lines(settings: &Settings) -> [String; 3] {
    [
        format!("theme:         {}", settings.theme.as_str()),
        format!("default view:  {}", settings.default_view.as_str()),
        format!("notifications: {}", settings.notifications),
    ]
}

pub fn print_settings(settings: &Settings) {
    for line in settings_lines(settings) {
        println!("{line}");
    }
}

pub fn print_dashboard<R: KeyValueRepository>(
    summary: &DashboardSummary<'_>,
    categories: &CategoryStore<R>,
) {
    print_stats(&summary.stats);
    print_section("due today", &summary.due_today, categories);
    print_section("upcoming", &summary.upcoming, categories);
    print_section("recent", &summary.recent, categories);

    println!();
    println!("categories:");
    if summary.category_counts.is_empty() {
        println!("  (none)");
    }
    for entry in &summary.category_counts {
        println!("  {}", category_line(entry.category, entry.task_count));
    }
}

fn print_section<R: KeyValueRepository>(
    title: &str,
    tasks: &[&Task],
    categories: &CategoryStore<R>,
) {
    println!();
    println!("{title}:");
    if tasks.is_empty() {
        println!("  (none)");
    }
    for task in tasks {
        println!("  {}", task_line(task, categories));
    }
}
