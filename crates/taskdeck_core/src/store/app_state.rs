//! Owned application state with change subscriptions.
//!
//! # Responsibility
//! - Hold the task, category and settings stores of one session.
//! - Route every mutation through one place so cascades and notifications
//!   stay consistent.
//!
//! # Invariants
//! - Listeners run synchronously, after the mutation is applied and
//!   persisted, exactly once per effective mutation.
//! - Rejected or no-op mutations (validation error, unknown id) emit nothing.

use crate::model::category::{
    Category, CategoryDraft, CategoryId, CategoryPatch, CategoryValidationError,
};
use crate::model::settings::{Settings, SettingsPatch};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::category_store::CategoryStore;
use crate::store::settings_store::SettingsStore;
use crate::store::task_store::TaskStore;
use crate::views::dashboard::{dashboard, DashboardSummary};
use chrono::Local;

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    TaskCreated(TaskId),
    TaskUpdated(TaskId),
    TaskDeleted(TaskId),
    CategoryCreated(CategoryId),
    CategoryUpdated(CategoryId),
    CategoryDeleted {
        category_id: CategoryId,
        detached_tasks: usize,
    },
    SettingsUpdated,
}

/// Outcome of `AppState::delete_category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRemoval {
    /// The category existed and is gone from the list.
    pub removed: bool,
    /// Tasks whose reference to the category was cleared. Non-zero even for
    /// an unknown id when tasks still pointed at it.
    pub detached_tasks: usize,
}

impl CategoryRemoval {
    /// Whether storage changed at all.
    pub fn changed(&self) -> bool {
        self.removed || self.detached_tasks > 0
    }
}

/// Handle returned by `AppState::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Session state container. Construct one per storage and pass it around.
pub struct AppState<R: KeyValueRepository + Clone> {
    tasks: TaskStore<R>,
    categories: CategoryStore<R>,
    settings: SettingsStore<R>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<R: KeyValueRepository + Clone> AppState<R> {
    /// Loads all collections from `repo`.
    pub fn load(repo: R) -> Self {
        Self {
            tasks: TaskStore::load(repo.clone()),
            categories: CategoryStore::load(repo.clone()),
            settings: SettingsStore::load(repo),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn tasks(&self) -> &TaskStore<R> {
        &self.tasks
    }

    pub fn categories(&self) -> &CategoryStore<R> {
        &self.categories
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    /// Registers `listener` for every subsequent event.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task, TaskValidationError> {
        let task = self.tasks.create(draft)?;
        self.emit(StoreEvent::TaskCreated(task.id));
        Ok(task)
    }

    pub fn update_task(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, TaskValidationError> {
        let updated = self.tasks.update(id, patch)?;
        if updated.is_some() {
            self.emit(StoreEvent::TaskUpdated(id));
        }
        Ok(updated)
    }

    pub fn toggle_task_completion(&mut self, id: TaskId) -> Option<Task> {
        let toggled = self.tasks.toggle_completion(id)?;
        self.emit(StoreEvent::TaskUpdated(id));
        Some(toggled)
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let deleted = self.tasks.delete(id);
        if deleted {
            self.emit(StoreEvent::TaskDeleted(id));
        }
        deleted
    }

    pub fn create_category(
        &mut self,
        draft: CategoryDraft,
    ) -> Result<Category, CategoryValidationError> {
        let category = self.categories.create(draft)?;
        self.emit(StoreEvent::CategoryCreated(category.id));
        Ok(category)
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, CategoryValidationError> {
        let updated = self.categories.update(id, patch)?;
        if updated.is_some() {
            self.emit(StoreEvent::CategoryUpdated(id));
        }
        Ok(updated)
    }

    /// Deletes a category and detaches it from every task.
    pub fn delete_category(&mut self, id: CategoryId) -> CategoryRemoval {
        let (removed, detached_tasks) = self.categories.delete_with_count(id, &mut self.tasks);
        let removal = CategoryRemoval {
            removed,
            detached_tasks,
        };
        if removal.changed() {
            self.emit(StoreEvent::CategoryDeleted {
                category_id: id,
                detached_tasks,
            });
        }
        removal
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        let settings = self.settings.update(patch);
        self.emit(StoreEvent::SettingsUpdated);
        settings
    }

    /// Dashboard for the current task list as of local now.
    pub fn dashboard(&self) -> DashboardSummary<'_> {
        dashboard(
            self.tasks.tasks(),
            self.categories.categories(),
            &Local::now(),
        )
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
