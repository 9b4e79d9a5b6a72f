//! Category store: CRUD over the session's category list.

use crate::model::category::{
    palette_color, Category, CategoryDraft, CategoryId, CategoryPatch, CategoryValidationError,
    NO_CATEGORY_LABEL,
};
use crate::repo::json_store::{load_records, save_best_effort, CATEGORIES_KEY};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::task_store::TaskStore;
use chrono::Utc;
use log::{debug, info, warn};

/// Ordered category list backed by the `categories` storage key.
pub struct CategoryStore<R: KeyValueRepository> {
    repo: R,
    categories: Vec<Category>,
}

impl<R: KeyValueRepository> CategoryStore<R> {
    /// Loads the stored category list, skipping records that break
    /// name/color invariants.
    pub fn load(repo: R) -> Self {
        let mut categories: Vec<Category> = load_records(&repo, CATEGORIES_KEY);
        let loaded = categories.len();
        categories.retain(|category| category.validate().is_ok());
        if categories.len() != loaded {
            warn!(
                "event=category_load module=store status=skipped invalid_count={}",
                loaded - categories.len()
            );
        }
        debug!(
            "event=category_load module=store status=ok count={}",
            categories.len()
        );
        Self { repo, categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Resolves a task's weak category reference; dangling ids resolve to
    /// `None`.
    pub fn resolve(&self, id: Option<CategoryId>) -> Option<&Category> {
        id.and_then(|id| self.get(id))
    }

    /// Display name for a category reference, `No Category` when absent or
    /// dangling.
    pub fn name_of(&self, id: Option<CategoryId>) -> &str {
        self.resolve(id)
            .map_or(NO_CATEGORY_LABEL, |category| category.name.as_str())
    }

    /// Appends a new category and persists the list.
    ///
    /// Without an explicit color the next palette color is used.
    pub fn create(&mut self, draft: CategoryDraft) -> Result<Category, CategoryValidationError> {
        let fallback = palette_color(self.categories.len());
        let category = Category::from_draft(draft, fallback, Utc::now())?;
        self.categories.push(category.clone());
        self.persist();
        info!(
            "event=category_create module=store status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    /// Applies `patch` to category `id`; `Ok(None)` for an unknown id.
    pub fn update(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, CategoryValidationError> {
        let Some(category) = self.categories.iter_mut().find(|category| category.id == id) else {
            debug!("event=category_update module=store status=not_found category_id={id}");
            return Ok(None);
        };
        category.apply_patch(patch)?;
        let updated = category.clone();
        self.persist();
        info!("event=category_update module=store status=ok category_id={id}");
        Ok(Some(updated))
    }

    /// Deletes category `id` and detaches it from `tasks`.
    ///
    /// Two independent writes happen: the category list, then the task list.
    /// Tasks are detached even when the category is already gone, which
    /// repairs references left by an interrupted earlier delete. Returns
    /// whether the category existed.
    pub fn delete<T: KeyValueRepository>(
        &mut self,
        id: CategoryId,
        tasks: &mut TaskStore<T>,
    ) -> bool {
        self.delete_with_count(id, tasks).0
    }

    pub(crate) fn delete_with_count<T: KeyValueRepository>(
        &mut self,
        id: CategoryId,
        tasks: &mut TaskStore<T>,
    ) -> (bool, usize) {
        let before = self.categories.len();
        self.categories.retain(|category| category.id != id);
        let removed = self.categories.len() != before;
        if removed {
            self.persist();
        }

        let detached = tasks.detach_category(id);
        info!(
            "event=category_delete module=store status={} category_id={} detached_tasks={}",
            if removed { "ok" } else { "not_found" },
            id,
            detached
        );
        (removed, detached)
    }

    fn persist(&self) -> bool {
        save_best_effort(&self.repo, CATEGORIES_KEY, &self.categories)
    }
}
