//! In-memory board state and its derived views.
//!
//! # Responsibility
//! - Hold every field the renderer reads (collections, drafts, cursors).
//! - Compute derived views (`notes_by_category`, `category_counts`) on read.
//!
//! # Invariants
//! - `notes` and `todos` are ordered newest-first.
//! - `categories` keeps insertion order.
//! - Derived views are never stored.

use super::category::{default_categories, GENERAL_CATEGORY};
use super::note::Note;
use super::todo::Todo;
use super::EntityId;
use serde::{Deserialize, Serialize};

/// View currently shown by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    #[default]
    Notes,
    Todos,
}

/// The four persisted collections, as loaded from or written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub notes: Vec<Note>,
    pub categories: Vec<String>,
    pub todos: Vec<Todo>,
    pub dark_mode: bool,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            categories: default_categories(),
            todos: Vec::new(),
            dark_mode: false,
        }
    }
}

/// Notes of one category, in board order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub notes: Vec<&'a Note>,
}

/// Full board state owned by `NoteBoard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub notes: Vec<Note>,
    pub categories: Vec<String>,
    pub todos: Vec<Todo>,
    /// Category applied to the next saved note.
    pub selected_category: String,
    pub note_draft: String,
    pub todo_draft: String,
    /// Pending input of the add-category field.
    pub category_draft: String,
    pub editing_note_id: Option<EntityId>,
    pub editing_todo_id: Option<EntityId>,
    pub dark_mode: bool,
    pub active_tab: ActiveTab,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::from_snapshot(BoardSnapshot::default())
    }
}

impl BoardState {
    /// Builds a fresh session state around persisted collections.
    ///
    /// Drafts and cursors always start empty; they are never persisted.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            notes: snapshot.notes,
            categories: snapshot.categories,
            todos: snapshot.todos,
            selected_category: GENERAL_CATEGORY.to_string(),
            note_draft: String::new(),
            todo_draft: String::new(),
            category_draft: String::new(),
            editing_note_id: None,
            editing_todo_id: None,
            dark_mode: snapshot.dark_mode,
            active_tab: ActiveTab::default(),
        }
    }

    /// Copies out the persisted part of the state.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            notes: self.notes.clone(),
            categories: self.categories.clone(),
            todos: self.todos.clone(),
            dark_mode: self.dark_mode,
        }
    }

    pub fn note(&self, id: EntityId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn todo(&self, id: EntityId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category == name)
    }

    /// Groups notes under every category, in category order.
    ///
    /// Categories without notes still appear, with an empty list.
    pub fn notes_by_category(&self) -> Vec<CategoryGroup<'_>> {
        self.categories
            .iter()
            .map(|category| CategoryGroup {
                category: category.as_str(),
                notes: self
                    .notes
                    .iter()
                    .filter(|note| &note.category == category)
                    .collect(),
            })
            .collect()
    }

    /// Note count per category, in category order.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.notes_by_category()
            .into_iter()
            .map(|group| (group.category, group.notes.len()))
            .collect()
    }

    pub fn open_todo_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.done).count()
    }
}
