//! In-memory key-value repository for tests and throwaway sessions.

use crate::repo::kv_repo::{KeyValueRepository, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Map-backed repository. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvRepository {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl InMemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueRepository for InMemoryKvRepository {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryKvRepository;
    use crate::repo::kv_repo::KeyValueRepository;

    #[test]
    fn clones_share_entries() {
        let repo = InMemoryKvRepository::new();
        let other = repo.clone();
        repo.set("tasks", "[]").unwrap();
        assert_eq!(other.get("tasks").unwrap().as_deref(), Some("[]"));
        assert!(other.remove("tasks").unwrap());
        assert!(repo.is_empty());
    }
}
