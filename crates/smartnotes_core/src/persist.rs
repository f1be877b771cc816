//! Whole-collection persistence of board state.
//!
//! # Responsibility
//! - Map each persisted collection to its fixed storage key.
//! - Load all collections once, falling back to defaults on bad payloads.
//! - Serialize a collection and overwrite its key after a mutation.
//!
//! # Invariants
//! - Payloads are JSON text; writes replace the whole collection.
//! - Loading never fails: absent or malformed payloads yield defaults.

use crate::model::board::{BoardSnapshot, BoardState};
use crate::model::category::default_categories;
use crate::store::{KeyValueStore, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key names for each persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub dark_mode: String,
    pub notes: String,
    pub categories: String,
    pub todos: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            dark_mode: "sn-darkMode".to_string(),
            notes: "sn-notes".to_string(),
            categories: "sn-categories".to_string(),
            todos: "sn-todos".to_string(),
        }
    }
}

impl StorageKeys {
    /// Builds keys sharing one prefix, e.g. `"work-"` gives `work-notes`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            dark_mode: format!("{prefix}darkMode"),
            notes: format!("{prefix}notes"),
            categories: format!("{prefix}categories"),
            todos: format!("{prefix}todos"),
        }
    }

    pub fn key_for(&self, collection: Collection) -> &str {
        match collection {
            Collection::Notes => &self.notes,
            Collection::Categories => &self.categories,
            Collection::Todos => &self.todos,
            Collection::DarkMode => &self.dark_mode,
        }
    }
}

/// One independently persisted part of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Notes,
    Categories,
    Todos,
    DarkMode,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Notes,
        Collection::Categories,
        Collection::Todos,
        Collection::DarkMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Categories => "categories",
            Self::Todos => "todos",
            Self::DarkMode => "dark_mode",
        }
    }
}

/// Set of collections touched by a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub notes: bool,
    pub categories: bool,
    pub todos: bool,
    pub dark_mode: bool,
}

impl Changes {
    pub const NONE: Changes = Changes {
        notes: false,
        categories: false,
        todos: false,
        dark_mode: false,
    };

    pub fn only(collection: Collection) -> Self {
        Self::NONE.with(collection)
    }

    pub fn with(mut self, collection: Collection) -> Self {
        match collection {
            Collection::Notes => self.notes = true,
            Collection::Categories => self.categories = true,
            Collection::Todos => self.todos = true,
            Collection::DarkMode => self.dark_mode = true,
        }
        self
    }

    pub fn merge(self, other: Changes) -> Self {
        Self {
            notes: self.notes || other.notes,
            categories: self.categories || other.categories,
            todos: self.todos || other.todos,
            dark_mode: self.dark_mode || other.dark_mode,
        }
    }

    pub fn contains(&self, collection: Collection) -> bool {
        match collection {
            Collection::Notes => self.notes,
            Collection::Categories => self.categories,
            Collection::Todos => self.todos,
            Collection::DarkMode => self.dark_mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Touched collections in a stable order.
    pub fn collections(self) -> impl Iterator<Item = Collection> {
        Collection::ALL
            .into_iter()
            .filter(move |collection| self.contains(*collection))
    }
}

/// Reads every collection from `store`, substituting defaults where needed.
pub fn load_snapshot(store: &impl KeyValueStore, keys: &StorageKeys) -> BoardSnapshot {
    BoardSnapshot {
        notes: load_field(store, keys, Collection::Notes).unwrap_or_default(),
        categories: load_field(store, keys, Collection::Categories)
            .unwrap_or_else(default_categories),
        todos: load_field(store, keys, Collection::Todos).unwrap_or_default(),
        dark_mode: load_field(store, keys, Collection::DarkMode).unwrap_or(false),
    }
}

/// Serializes one collection of `state` and overwrites its key.
pub fn write_collection(
    store: &mut impl KeyValueStore,
    keys: &StorageKeys,
    state: &BoardState,
    collection: Collection,
) -> StoreResult<()> {
    let payload = match collection {
        Collection::Notes => encode(&state.notes)?,
        Collection::Categories => encode(&state.categories)?,
        Collection::Todos => encode(&state.todos)?,
        Collection::DarkMode => encode(&state.dark_mode)?,
    };
    store.set(keys.key_for(collection), &payload)
}

/// Writes all four collections of `snapshot`.
pub fn write_snapshot(
    store: &mut impl KeyValueStore,
    keys: &StorageKeys,
    snapshot: &BoardSnapshot,
) -> StoreResult<()> {
    store.set(&keys.notes, &encode(&snapshot.notes)?)?;
    store.set(&keys.categories, &encode(&snapshot.categories)?)?;
    store.set(&keys.todos, &encode(&snapshot.todos)?)?;
    store.set(&keys.dark_mode, &encode(&snapshot.dark_mode)?)?;
    Ok(())
}

fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn load_field<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    keys: &StorageKeys,
    collection: Collection,
) -> Option<T> {
    let key = keys.key_for(collection);
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(
                "event=board_load_field module=persist status=default reason=absent collection={}",
                collection.as_str()
            );
            return None;
        }
        Err(err) => {
            warn!(
                "event=board_load_field module=persist status=default reason=store_error collection={} error={}",
                collection.as_str(),
                err
            );
            return None;
        }
    };

    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!(
                "event=board_load_field module=persist status=default reason=null collection={}",
                collection.as_str()
            );
            None
        }
        Err(err) => {
            // Payload text can contain user notes; log only its size.
            warn!(
                "event=board_load_field module=persist status=default reason=malformed collection={} payload_len={} error_line={} error_column={}",
                collection.as_str(),
                raw.len(),
                err.line(),
                err.column()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::Note;
    use crate::model::todo::Todo;
    use crate::store::MemoryStore;

    #[test]
    fn empty_store_loads_defaults() {
        let snapshot = load_snapshot(&MemoryStore::new(), &StorageKeys::default());
        assert_eq!(snapshot, BoardSnapshot::default());
    }

    #[test]
    fn malformed_payloads_fall_back_per_field() {
        let store = MemoryStore::with_entries([
            ("sn-notes", "{not json"),
            ("sn-categories", r#"["General","Work"]"#),
            ("sn-todos", r#"[{"id":"x"}]"#),
            ("sn-darkMode", "maybe"),
        ]);
        let snapshot = load_snapshot(&store, &StorageKeys::default());

        assert!(snapshot.notes.is_empty());
        assert_eq!(snapshot.categories, vec!["General", "Work"]);
        assert!(snapshot.todos.is_empty());
        assert!(!snapshot.dark_mode);
    }

    #[test]
    fn null_payload_is_treated_as_absent() {
        let store = MemoryStore::with_entries([("sn-categories", "null")]);
        let snapshot = load_snapshot(&store, &StorageKeys::default());
        assert_eq!(snapshot.categories, vec!["General"]);
    }

    #[test]
    fn dark_mode_is_written_as_bare_boolean() {
        let mut store = MemoryStore::new();
        let mut state = BoardState::default();
        state.dark_mode = true;
        write_collection(&mut store, &StorageKeys::default(), &state, Collection::DarkMode)
            .unwrap();
        assert_eq!(store.value("sn-darkMode"), Some("true"));
    }

    #[test]
    fn snapshot_survives_write_and_reload() {
        let snapshot = BoardSnapshot {
            notes: vec![Note::new(2, "b", "Work"), Note::new(1, "a", "General")],
            categories: vec!["General".into(), "Work".into()],
            todos: vec![Todo {
                id: 5,
                text: "ship".into(),
                done: true,
            }],
            dark_mode: true,
        };
        let keys = StorageKeys::with_prefix("test-");
        let mut store = MemoryStore::new();
        write_snapshot(&mut store, &keys, &snapshot).unwrap();

        assert!(store.value("test-notes").is_some());
        assert_eq!(load_snapshot(&store, &keys), snapshot);
    }

    #[test]
    fn changes_merge_and_iterate_in_stable_order() {
        let changes = Changes::only(Collection::Todos).merge(Changes::only(Collection::Notes));
        let touched: Vec<_> = changes.collections().collect();
        assert_eq!(touched, vec![Collection::Notes, Collection::Todos]);
        assert!(Changes::NONE.is_empty());
    }
}
