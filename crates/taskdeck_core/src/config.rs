//! Runtime configuration validation.
//!
//! # Responsibility
//! - Turn raw option values gathered by a front end (flags, environment)
//!   into a validated `CoreConfig`.
//! - Fill in defaults for anything left unset.
//!
//! # Invariants
//! - This module never reads the process environment.
//! - A resolved `CoreConfig` always carries a normalized log level.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Default database file name, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) | Self::InvalidLogDir(message) => {
                write!(f, "{message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Unvalidated option values. Blank strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigInput {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    pub logging_enabled: Option<bool>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging is skipped when `None` even if `logging_enabled` is set.
    pub log_dir: Option<PathBuf>,
    pub logging_enabled: bool,
}

impl CoreConfig {
    /// Validates `input` and applies defaults: `taskdeck.sqlite3` in the
    /// working directory, the build-mode log level, logging enabled.
    ///
    /// # Errors
    /// - Unknown log level.
    /// - Empty or relative log directory.
    pub fn resolve(input: ConfigInput) -> Result<Self, ConfigError> {
        let db_path = input
            .db_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let log_level = match non_blank(input.log_level) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log_dir = non_blank(input.log_dir)
            .map(|dir| normalize_log_dir(&dir).map_err(ConfigError::InvalidLogDir))
            .transpose()?;

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            logging_enabled: input.logging_enabled.unwrap_or(true),
        })
    }

    /// Log directory to initialise, if logging should run at all.
    pub fn active_log_dir(&self) -> Option<&PathBuf> {
        if self.logging_enabled {
            self.log_dir.as_ref()
        } else {
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
