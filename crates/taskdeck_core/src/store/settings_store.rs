//! Settings store backed by the `settings` storage key.

use crate::model::settings::{Settings, SettingsPatch};
use crate::repo::json_store::{load_or_default, save_best_effort, SETTINGS_KEY};
use crate::repo::kv_repo::KeyValueRepository;
use log::info;

pub struct SettingsStore<R: KeyValueRepository> {
    repo: R,
    settings: Settings,
}

impl<R: KeyValueRepository> SettingsStore<R> {
    /// Loads stored settings; anything unreadable falls back to defaults.
    pub fn load(repo: R) -> Self {
        let settings = load_or_default(&repo, SETTINGS_KEY);
        Self { repo, settings }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Merges `patch` and persists the whole settings record.
    pub fn update(&mut self, patch: SettingsPatch) -> Settings {
        self.settings.merge(patch);
        save_best_effort(&self.repo, SETTINGS_KEY, &self.settings);
        info!(
            "event=settings_update module=store status=ok theme={:?} default_view={:?} notifications={}",
            self.settings.theme, self.settings.default_view, self.settings.notifications
        );
        self.settings.clone()
    }
}
