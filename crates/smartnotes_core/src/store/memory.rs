//! In-memory key/value store.

use super::{KeyValueStore, StoreResult};
use std::collections::BTreeMap;

/// Process-local store backed by a sorted map.
///
/// Used by tests and by callers that do not need durability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `(key, value)` pairs.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Borrowing read without the `StoreResult` wrapper.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::KeyValueStore;

    #[test]
    fn set_overwrites_whole_value() {
        let mut store = MemoryStore::new();
        store.set("k", "[1,2]").unwrap();
        store.set("k", "[3]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[3]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = MemoryStore::with_entries([("a", "1")]);
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.value("a"), Some("1"));
    }
}
