//! Task record and its due-date classifications.
//!
//! # Responsibility
//! - Define the canonical `Task` record and the `Priority` scale.
//! - Build tasks from drafts and apply partial updates.
//! - Classify tasks as overdue / due today / due soon relative to `now`.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by `Task::from_draft` only.
//! - Every successful `apply_patch` refreshes `updated_at`.
//! - `title` is non-empty after trimming.

use crate::model::category::CategoryId;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Window, in whole days, that counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Task urgency scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invariant violation for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Weak reference; may point at a category that no longer exists.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<CategoryId>,
    pub completed: bool,
}

impl TaskDraft {
    /// Draft with only a title; every other field takes its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing task.
///
/// `None` leaves a field untouched. The doubly optional fields distinguish
/// "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub category_id: Option<Option<CategoryId>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

impl Task {
    /// Builds a task with a fresh id and `created_at == updated_at == now`.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    pub fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            priority: draft.priority,
            due_date: draft.due_date,
            category_id: draft.category_id,
            completed: draft.completed,
            created_at: now,
            updated_at: now,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Applies `patch` and stamps `updated_at = now`.
    ///
    /// The task is left untouched when the patch would break an invariant.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<(), TaskValidationError> {
        let title = match patch.title {
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(TaskValidationError::EmptyTitle);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Open task whose due date is strictly before `now`.
    pub fn is_overdue<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        match self.open_due_date() {
            Some(due) => due < now.with_timezone(&Utc),
            None => false,
        }
    }

    /// Open task whose due date falls on the same calendar day as `now`,
    /// both read in `now`'s time zone.
    pub fn is_due_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        match self.open_due_date() {
            Some(due) => due.with_timezone(&now.timezone()).date_naive() == now.date_naive(),
            None => false,
        }
    }

    /// Open task due within `0..=DUE_SOON_DAYS` days of `now`.
    pub fn is_due_soon<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        if self.completed {
            return false;
        }
        matches!(self.days_until_due(now), Some(days) if (0..=DUE_SOON_DAYS).contains(&days))
    }

    /// Whole days from `now` until the due date, rounded up.
    ///
    /// A task due later today yields `1`; one due a few hours ago yields `0`.
    pub fn days_until_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<i64> {
        let due = self.due_date?;
        let diff_ms = (due - now.with_timezone(&Utc)).num_milliseconds();
        Some(ceil_div(diff_ms, MILLIS_PER_DAY))
    }

    fn open_due_date(&self) -> Option<DateTime<Utc>> {
        if self.completed {
            None
        } else {
            self.due_date
        }
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    -((-value).div_euclid(divisor))
}
