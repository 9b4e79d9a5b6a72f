//! Typed JSON access over a `KeyValueRepository`.
//!
//! # Responsibility
//! - Map storage keys to JSON-encoded collections and records.
//! - Provide best-effort load/save that log failures instead of returning
//!   them, so a broken store never takes the session down.
//!
//! # Invariants
//! - A collection key that is not a JSON array loads as empty.
//! - Inside a readable array, each record decodes on its own; one bad record
//!   never hides the others.

use crate::repo::kv_repo::{KeyValueRepository, StorageError, StorageResult};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Key holding the ordered task list.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the ordered category list.
pub const CATEGORIES_KEY: &str = "categories";
/// Key holding the settings object.
pub const SETTINGS_KEY: &str = "settings";

/// Reads and decodes `key`. Missing keys yield `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(
    repo: &impl KeyValueRepository,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = repo.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

/// Encodes `value` and stores it under `key`, replacing any previous value.
pub fn write_json<T: Serialize + ?Sized>(
    repo: &impl KeyValueRepository,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    repo.set(key, &raw)
}

/// Reads `key`, falling back to `T::default()` on a missing key or any error.
pub fn load_or_default<T: DeserializeOwned + Default>(
    repo: &impl KeyValueRepository,
    key: &str,
) -> T {
    match read_json(repo, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            error!(
                "event=storage_read module=repo status=error key={} error={}",
                key, err
            );
            T::default()
        }
    }
}

/// Reads the JSON array under `key` record by record.
///
/// Records that fail to decode are dropped and counted in a
/// `status=skipped` warning. A missing key, a non-array value or any storage
/// error yields an empty list.
pub fn load_records<T: DeserializeOwned>(repo: &impl KeyValueRepository, key: &str) -> Vec<T> {
    let raw: Vec<Value> = load_or_default(repo, key);
    let stored = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() != stored {
        warn!(
            "event=storage_read module=repo status=skipped key={} invalid_count={}",
            key,
            stored - records.len()
        );
    }
    records
}

/// Writes `value` under `key`; failures are logged and reported as `false`.
pub fn save_best_effort<T: Serialize + ?Sized>(
    repo: &impl KeyValueRepository,
    key: &str,
    value: &T,
) -> bool {
    match write_json(repo, key, value) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event=storage_write module=repo status=error key={} error={}",
                key, err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load_or_default, load_records, read_json, save_best_effort, TASKS_KEY};
    use crate::repo::kv_repo::{KeyValueRepository, StorageError};
    use crate::repo::memory_repo::InMemoryKvRepository;

    #[test]
    fn missing_key_reads_as_none_and_default() {
        let repo = InMemoryKvRepository::new();
        assert!(read_json::<Vec<u32>>(&repo, TASKS_KEY).unwrap().is_none());
        assert!(load_or_default::<Vec<u32>>(&repo, TASKS_KEY).is_empty());
    }

    #[test]
    fn corrupt_value_is_an_error_but_loads_as_default() {
        let repo = InMemoryKvRepository::new();
        repo.set(TASKS_KEY, "{not json").unwrap();

        let err = read_json::<Vec<u32>>(&repo, TASKS_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == TASKS_KEY));
        assert!(load_or_default::<Vec<u32>>(&repo, TASKS_KEY).is_empty());
    }

    #[test]
    fn save_then_load_returns_same_value() {
        let repo = InMemoryKvRepository::new();
        assert!(save_best_effort(&repo, TASKS_KEY, &[1_u32, 2, 3]));
        assert_eq!(load_or_default::<Vec<u32>>(&repo, TASKS_KEY), vec![1, 2, 3]);
    }

    #[test]
    fn undecodable_records_are_skipped_individually() {
        let repo = InMemoryKvRepository::new();
        repo.set(TASKS_KEY, r#"[1, "two", 3, null, 4]"#).unwrap();
        assert_eq!(load_records::<u32>(&repo, TASKS_KEY), vec![1, 3, 4]);

        repo.set(TASKS_KEY, r#"{"not":"an array"}"#).unwrap();
        assert!(load_records::<u32>(&repo, TASKS_KEY).is_empty());
    }
}
