//! Task form validation.
//!
//! # Responsibility
//! - Turn raw form input into a `TaskDraft` / `TaskPatch`.
//! - Report per-field messages for the UI; invalid input never reaches a
//!   store.
//!
//! # Invariants
//! - A due date is stored as midnight UTC of the chosen calendar day.

use crate::model::category::CategoryId;
use crate::model::task::{Priority, Task, TaskDraft, TaskPatch};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_REQUIRED: &str = "Task title is required";
pub const DUE_DATE_IN_PAST: &str = "Due date cannot be in the past";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Title,
    DueDate,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::DueDate => "dueDate",
        }
    }
}

/// Field-level validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl FormErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.errors.insert(field, message);
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl Error for FormErrors {}

/// Raw values collected by a task create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl TaskForm {
    /// Prefills the form for editing `task`.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date.map(|due| due.date_naive()),
            category_id: task.category_id,
        }
    }

    /// Checks the form against `today`'s calendar date.
    pub fn check(&self, today: NaiveDate) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.title.trim().is_empty() {
            errors.insert(FormField::Title, TITLE_REQUIRED);
        }
        if self.due_date.is_some_and(|due| due < today) {
            errors.insert(FormField::DueDate, DUE_DATE_IN_PAST);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and converts into a draft for `TaskStore::create`.
    pub fn into_draft(self, today: NaiveDate) -> Result<TaskDraft, FormErrors> {
        self.check(today)?;
        Ok(TaskDraft {
            due_date: self.due_date.map(start_of_day_utc),
            title: self.title,
            description: self.description,
            priority: self.priority,
            category_id: self.category_id,
            completed: false,
        })
    }

    /// Validates and converts into a full-replacement patch for
    /// `TaskStore::update`. Completion state is left alone.
    pub fn into_patch(self, today: NaiveDate) -> Result<TaskPatch, FormErrors> {
        self.check(today)?;
        Ok(TaskPatch {
            due_date: Some(self.due_date.map(start_of_day_utc)),
            title: Some(self.title),
            description: Some(self.description),
            priority: Some(self.priority),
            category_id: Some(self.category_id),
            completed: None,
        })
    }
}

/// Midnight UTC of `date`, the stored form of a picked due date.
///
/// `check` compares against the caller's local calendar day, so west of UTC
/// a task accepted as due today is already overdue and no longer due today
/// in local time. Stored data depends on this layout; keep it.
fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

#[cfg(test)]
mod tests {
    use super::{FormField, TaskForm, DUE_DATE_IN_PAST, TITLE_REQUIRED};
    use crate::model::task::Task;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reports_every_invalid_field() {
        let form = TaskForm {
            title: "   ".to_string(),
            due_date: Some(day(2024, 1, 9)),
            ..TaskForm::default()
        };
        let errors = form.check(day(2024, 1, 10)).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::Title), Some(TITLE_REQUIRED));
        assert_eq!(errors.get(FormField::DueDate), Some(DUE_DATE_IN_PAST));
    }

    #[test]
    fn today_is_an_acceptable_due_date() {
        let form = TaskForm {
            title: "Pay rent".to_string(),
            due_date: Some(day(2024, 1, 10)),
            ..TaskForm::default()
        };
        let draft = form.into_draft(day(2024, 1, 10)).unwrap();
        assert_eq!(
            draft.due_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn patch_can_clear_due_date_and_category() {
        let form = TaskForm {
            title: "Edit me".to_string(),
            ..TaskForm::default()
        };
        let patch = form.into_patch(day(2024, 1, 10)).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.category_id, Some(None));
        assert_eq!(patch.completed, None);
    }

    #[test]
    fn errors_display_as_field_message_pairs() {
        let form = TaskForm::default();
        let errors = form.check(day(2024, 1, 10)).unwrap_err();
        assert_eq!(errors.to_string(), format!("title: {TITLE_REQUIRED}"));
    }

    #[test]
    fn due_today_west_of_utc_reads_as_overdue() {
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = new_york.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let today = now.date_naive();

        let form = TaskForm {
            title: "Call the bank".to_string(),
            due_date: Some(today),
            ..TaskForm::default()
        };
        let draft = form.into_draft(today).unwrap();
        let task = Task::from_draft(draft, now.with_timezone(&Utc)).unwrap();

        assert_eq!(
            task.due_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert!(task.is_overdue(&now));
        assert!(!task.is_due_today(&now));
    }
}
