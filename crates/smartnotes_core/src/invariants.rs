//! Cross-field board invariants, checked and repaired in one place.
//!
//! # Responsibility
//! - Detect state that breaks board invariants (`violations`).
//! - Restore them after load and after every mutation (`repair`).
//!
//! # Invariants
//! - `General` is present in `categories`.
//! - Categories are unique and non-blank.
//! - Note/todo text is trimmed and non-empty; ids are unique per collection.
//! - Every note's category exists; `selected_category` exists.
//! - Edit cursors point at existing entities.

use crate::model::board::BoardState;
use crate::model::category::GENERAL_CATEGORY;
use crate::model::EntityId;
use crate::persist::{Changes, Collection};
use log::warn;
use std::collections::HashSet;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingGeneralCategory,
    BlankCategory,
    DuplicateCategory(String),
    InvalidNoteText(EntityId),
    DuplicateNoteId(EntityId),
    UnknownNoteCategory { note_id: EntityId, category: String },
    InvalidTodoText(EntityId),
    DuplicateTodoId(EntityId),
    UnknownSelectedCategory(String),
    DanglingNoteCursor(EntityId),
    DanglingTodoCursor(EntityId),
}

/// Lists every invariant `state` currently breaks.
pub fn violations(state: &BoardState) -> Vec<Violation> {
    let mut found = Vec::new();

    if !state.has_category(GENERAL_CATEGORY) {
        found.push(Violation::MissingGeneralCategory);
    }
    let mut seen_categories = HashSet::new();
    for category in &state.categories {
        if category.trim().is_empty() {
            found.push(Violation::BlankCategory);
        } else if !seen_categories.insert(category.as_str()) {
            found.push(Violation::DuplicateCategory(category.clone()));
        }
    }

    let mut seen_notes = HashSet::new();
    for note in &state.notes {
        if !is_clean_text(&note.text) {
            found.push(Violation::InvalidNoteText(note.id));
        }
        if !seen_notes.insert(note.id) {
            found.push(Violation::DuplicateNoteId(note.id));
        }
        if !state.has_category(&note.category) {
            found.push(Violation::UnknownNoteCategory {
                note_id: note.id,
                category: note.category.clone(),
            });
        }
    }

    let mut seen_todos = HashSet::new();
    for todo in &state.todos {
        if !is_clean_text(&todo.text) {
            found.push(Violation::InvalidTodoText(todo.id));
        }
        if !seen_todos.insert(todo.id) {
            found.push(Violation::DuplicateTodoId(todo.id));
        }
    }

    if !state.has_category(&state.selected_category) {
        found.push(Violation::UnknownSelectedCategory(
            state.selected_category.clone(),
        ));
    }
    if let Some(id) = state.editing_note_id {
        if state.note(id).is_none() {
            found.push(Violation::DanglingNoteCursor(id));
        }
    }
    if let Some(id) = state.editing_todo_id {
        if state.todo(id).is_none() {
            found.push(Violation::DanglingTodoCursor(id));
        }
    }

    found
}

/// Restores all invariants in place and reports which persisted
/// collections had to change.
///
/// Repairs never delete a note because of its category: notes whose
/// category is missing move to `General`. Category cascades are the
/// caller's job and must happen before this runs.
pub fn repair(state: &mut BoardState) -> Changes {
    let mut changes = Changes::NONE;

    if repair_categories(&mut state.categories) {
        changes = changes.with(Collection::Categories);
    }
    if repair_notes(state) {
        changes = changes.with(Collection::Notes);
    }
    if repair_todos(state) {
        changes = changes.with(Collection::Todos);
    }

    if !state.has_category(&state.selected_category) {
        state.selected_category = GENERAL_CATEGORY.to_string();
    }
    if let Some(id) = state.editing_note_id {
        if state.note(id).is_none() {
            state.editing_note_id = None;
            state.note_draft.clear();
            state.selected_category = GENERAL_CATEGORY.to_string();
        }
    }
    if let Some(id) = state.editing_todo_id {
        if state.todo(id).is_none() {
            state.editing_todo_id = None;
            state.todo_draft.clear();
        }
    }

    if !changes.is_empty() {
        warn!(
            "event=invariant_repair module=invariants status=repaired notes={} categories={} todos={}",
            changes.notes, changes.categories, changes.todos
        );
    }
    changes
}

fn repair_categories(categories: &mut Vec<String>) -> bool {
    let before = categories.len();
    let mut seen = HashSet::new();
    categories.retain(|category| !category.trim().is_empty() && seen.insert(category.clone()));
    let mut changed = categories.len() != before;

    if !categories.iter().any(|category| category == GENERAL_CATEGORY) {
        categories.insert(0, GENERAL_CATEGORY.to_string());
        changed = true;
    }
    changed
}

fn repair_notes(state: &mut BoardState) -> bool {
    let mut changed = false;
    let mut seen = HashSet::new();
    let categories = &state.categories;

    state.notes.retain_mut(|note| {
        if !clean_in_place(&mut note.text, &mut changed) || !seen.insert(note.id) {
            changed = true;
            return false;
        }
        if !categories.iter().any(|category| category == &note.category) {
            note.category = GENERAL_CATEGORY.to_string();
            changed = true;
        }
        true
    });
    changed
}

fn repair_todos(state: &mut BoardState) -> bool {
    let mut changed = false;
    let mut seen = HashSet::new();

    state.todos.retain_mut(|todo| {
        if !clean_in_place(&mut todo.text, &mut changed) || !seen.insert(todo.id) {
            changed = true;
            return false;
        }
        true
    });
    changed
}

/// Trims `text` in place; returns `false` when nothing is left.
fn clean_in_place(text: &mut String, changed: &mut bool) -> bool {
    if !is_clean_text(text) {
        let trimmed = text.trim().to_string();
        *text = trimmed;
        *changed = true;
    }
    !text.is_empty()
}

fn is_clean_text(text: &str) -> bool {
    !text.is_empty() && text.trim() == text
}

#[cfg(test)]
mod tests {
    use super::{repair, violations, Violation};
    use crate::model::board::{BoardSnapshot, BoardState};
    use crate::model::note::Note;
    use crate::model::todo::Todo;

    #[test]
    fn default_state_has_no_violations() {
        assert!(violations(&BoardState::default()).is_empty());
    }

    #[test]
    fn repair_restores_general_and_dedupes_categories() {
        let mut state = BoardState::from_snapshot(BoardSnapshot {
            categories: vec!["Work".into(), "Work".into(), " ".into()],
            ..BoardSnapshot::default()
        });
        assert!(violations(&state).contains(&Violation::MissingGeneralCategory));

        let changes = repair(&mut state);
        assert!(changes.categories);
        assert_eq!(state.categories, vec!["General", "Work"]);
        assert!(violations(&state).is_empty());
    }

    #[test]
    fn repair_moves_orphaned_notes_to_general() {
        let mut state = BoardState::from_snapshot(BoardSnapshot {
            notes: vec![Note::new(1, "orphan", "Gone")],
            ..BoardSnapshot::default()
        });
        let changes = repair(&mut state);
        assert!(changes.notes);
        assert_eq!(state.notes[0].category, "General");
    }

    #[test]
    fn repair_trims_text_and_drops_blank_and_duplicate_entities() {
        let mut state = BoardState::from_snapshot(BoardSnapshot {
            notes: vec![
                Note::new(1, "  padded ", "General"),
                Note::new(2, "   ", "General"),
                Note::new(1, "duplicate id", "General"),
            ],
            todos: vec![Todo::new(9, ""), Todo::new(8, "keep")],
            ..BoardSnapshot::default()
        });

        let changes = repair(&mut state);
        assert!(changes.notes && changes.todos);
        assert_eq!(state.notes, vec![Note::new(1, "padded", "General")]);
        assert_eq!(state.todos, vec![Todo::new(8, "keep")]);
    }

    #[test]
    fn repair_clears_dangling_cursors_and_their_drafts() {
        let mut state = BoardState::default();
        state.editing_note_id = Some(42);
        state.note_draft = "stale".into();
        state.editing_todo_id = Some(43);
        state.todo_draft = "stale".into();
        state.selected_category = "Missing".into();

        let changes = repair(&mut state);
        assert!(changes.is_empty());
        assert_eq!(state.editing_note_id, None);
        assert_eq!(state.editing_todo_id, None);
        assert!(state.note_draft.is_empty());
        assert!(state.todo_draft.is_empty());
        assert_eq!(state.selected_category, "General");
    }
}
