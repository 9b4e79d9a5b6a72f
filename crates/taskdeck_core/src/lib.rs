//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for task and category invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod views;

pub use config::{ConfigError, ConfigInput, CoreConfig};
pub use form::{FormErrors, FormField, TaskForm};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::category::{
    available_colors, Category, CategoryDraft, CategoryId, CategoryPatch,
    CategoryValidationError, NO_CATEGORY_LABEL,
};
pub use model::settings::{DefaultView, Settings, SettingsPatch, Theme};
pub use model::task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
pub use repo::kv_repo::{KeyValueRepository, SqliteKvRepository, StorageError, StorageResult};
pub use repo::memory_repo::InMemoryKvRepository;
pub use store::app_state::{AppState, CategoryRemoval, StoreEvent, SubscriptionId};
pub use store::category_store::CategoryStore;
pub use store::settings_store::SettingsStore;
pub use store::task_store::TaskStore;
pub use views::dashboard::{CategoryCount, DashboardSummary};
pub use views::derive::TaskStats;
pub use views::filter::TaskFilter;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
