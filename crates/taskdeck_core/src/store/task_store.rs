//! Task store: CRUD and derivations over the session's task list.

use crate::model::category::CategoryId;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
use crate::repo::json_store::{load_records, save_best_effort, TASKS_KEY};
use crate::repo::kv_repo::KeyValueRepository;
use crate::views::derive::{self, TaskStats};
use crate::views::filter::TaskFilter;
use chrono::{Local, Utc};
use log::{debug, info, warn};

/// Ordered task list backed by the `tasks` storage key.
pub struct TaskStore<R: KeyValueRepository> {
    repo: R,
    tasks: Vec<Task>,
}

impl<R: KeyValueRepository> TaskStore<R> {
    /// Loads the stored task list.
    ///
    /// Unreadable storage yields an empty list. Records that fail to decode
    /// or break the title invariant are skipped one by one.
    pub fn load(repo: R) -> Self {
        let mut tasks: Vec<Task> = load_records(&repo, TASKS_KEY);
        let loaded = tasks.len();
        tasks.retain(|task| task.validate().is_ok());
        if tasks.len() != loaded {
            warn!(
                "event=task_load module=store status=skipped invalid_count={}",
                loaded - tasks.len()
            );
        }
        debug!("event=task_load module=store status=ok count={}", tasks.len());
        Self { repo, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a new task built from `draft` and persists the list.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, TaskValidationError> {
        let task = Task::from_draft(draft, Utc::now())?;
        self.tasks.push(task.clone());
        self.persist();
        info!("event=task_create module=store status=ok task_id={}", task.id);
        Ok(task)
    }

    /// Applies `patch` to task `id`.
    ///
    /// Returns `Ok(None)` for an unknown id; a patch that would blank the
    /// title is rejected without touching the task.
    pub fn update(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, TaskValidationError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_update module=store status=not_found task_id={id}");
            return Ok(None);
        };
        task.apply_patch(patch, Utc::now())?;
        let updated = task.clone();
        self.persist();
        info!("event=task_update module=store status=ok task_id={id}");
        Ok(Some(updated))
    }

    /// Removes task `id`; returns whether it existed.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=store status=not_found task_id={id}");
            return false;
        }
        self.persist();
        info!("event=task_delete module=store status=ok task_id={id}");
        true
    }

    /// Flips `completed` on task `id`.
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<Task> {
        let completed = self.get(id)?.completed;
        // A completion-only patch cannot fail validation.
        self.update(id, TaskPatch::completed(!completed))
            .ok()
            .flatten()
    }

    /// Clears `category_id` on every task pointing at `category_id`.
    ///
    /// Touched tasks get a fresh `updated_at`; the list is persisted only when
    /// something changed. Returns the number of detached tasks.
    pub fn detach_category(&mut self, category_id: CategoryId) -> usize {
        let now = Utc::now();
        let mut detached = 0;
        for task in self
            .tasks
            .iter_mut()
            .filter(|task| task.category_id == Some(category_id))
        {
            task.category_id = None;
            task.updated_at = now;
            detached += 1;
        }
        if detached > 0 {
            self.persist();
            info!(
                "event=task_detach_category module=store status=ok category_id={} count={}",
                category_id, detached
            );
        }
        detached
    }

    pub fn by_category(&self, category_id: CategoryId) -> Vec<&Task> {
        derive::by_category(&self.tasks, category_id)
    }

    pub fn by_completion(&self, completed: bool) -> Vec<&Task> {
        derive::by_completion(&self.tasks, completed)
    }

    pub fn overdue(&self) -> Vec<&Task> {
        derive::overdue(&self.tasks, &Local::now())
    }

    pub fn due_today(&self) -> Vec<&Task> {
        derive::due_today(&self.tasks, &Local::now())
    }

    pub fn due_soon(&self) -> Vec<&Task> {
        derive::due_soon(&self.tasks, &Local::now())
    }

    pub fn stats(&self) -> TaskStats {
        derive::stats(&self.tasks, &Local::now())
    }

    pub fn search(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }

    fn persist(&self) -> bool {
        save_best_effort(&self.repo, TASKS_KEY, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::task::{TaskDraft, TaskPatch, TaskValidationError};
    use crate::repo::memory_repo::InMemoryKvRepository;
    use uuid::Uuid;

    #[test]
    fn unknown_ids_are_sentinels_not_errors() {
        let mut store = TaskStore::load(InMemoryKvRepository::new());
        let missing = Uuid::new_v4();
        assert_eq!(store.update(missing, TaskPatch::completed(true)), Ok(None));
        assert!(store.toggle_completion(missing).is_none());
        assert!(!store.delete(missing));
    }

    #[test]
    fn update_rejects_blank_title() {
        let mut store = TaskStore::load(InMemoryKvRepository::new());
        let task = store.create(TaskDraft::titled("draft")).unwrap();
        let patch = TaskPatch {
            title: Some("   ".to_string()),
            ..TaskPatch::default()
        };
        assert_eq!(
            store.update(task.id, patch),
            Err(TaskValidationError::EmptyTitle)
        );
        assert_eq!(store.get(task.id).unwrap().title, "draft");
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = TaskStore::load(InMemoryKvRepository::new());
        let task = store.create(TaskDraft::titled("flip")).unwrap();
        assert!(store.toggle_completion(task.id).unwrap().completed);
        assert!(!store.toggle_completion(task.id).unwrap().completed);
    }
}
