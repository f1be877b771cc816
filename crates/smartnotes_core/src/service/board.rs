//! Note board use-case service.
//!
//! # Responsibility
//! - Own all board state and apply discrete user actions to it.
//! - Mirror every mutation to the key/value store, one whole collection
//!   per key.
//! - Route confirmations and rejection notices through the injected prompt.
//!
//! # Invariants
//! - Every mutation ends in `commit`, which repairs invariants and then
//!   persists each touched collection.
//! - No action changes an entity id.
//! - Store failures are logged; in-memory state stays authoritative.

use crate::ids::IdGenerator;
use crate::invariants;
use crate::model::board::{ActiveTab, BoardState};
use crate::model::category::{
    delete_confirmation_message, is_general, CategoryRejection, GENERAL_CATEGORY,
};
use crate::model::note::Note;
use crate::model::todo::Todo;
use crate::model::{normalize_text, EntityId};
use crate::persist::{load_snapshot, write_collection, Changes, Collection, StorageKeys};
use crate::prompt::Prompt;
use crate::store::KeyValueStore;
use log::{debug, error, info};

/// Result of a note/todo save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new entity was prepended with this id.
    Created(EntityId),
    /// The entity under the edit cursor was replaced in place.
    Updated(EntityId),
    /// Draft text was blank, or no free id was left; nothing changed.
    Ignored,
}

/// Stateful note/todo board over a key/value store.
pub struct NoteBoard<S, P, G>
where
    S: KeyValueStore,
    P: Prompt,
    G: IdGenerator,
{
    state: BoardState,
    store: S,
    prompt: P,
    ids: G,
    keys: StorageKeys,
}

impl<S, P, G> NoteBoard<S, P, G>
where
    S: KeyValueStore,
    P: Prompt,
    G: IdGenerator,
{
    /// Loads a board from `store` using the default storage keys.
    pub fn load(store: S, prompt: P, ids: G) -> Self {
        Self::load_with_keys(store, prompt, ids, StorageKeys::default())
    }

    /// Loads a board from `store` using custom storage keys.
    ///
    /// Each key is read once. Collections that needed repair are written
    /// back immediately.
    pub fn load_with_keys(store: S, prompt: P, ids: G, keys: StorageKeys) -> Self {
        let snapshot = load_snapshot(&store, &keys);
        let mut board = Self {
            state: BoardState::from_snapshot(snapshot),
            store,
            prompt,
            ids,
            keys,
        };
        board.commit(Changes::NONE);

        info!(
            "event=board_load module=board status=ok notes={} categories={} todos={} dark_mode={}",
            board.state.notes.len(),
            board.state.categories.len(),
            board.state.todos.len(),
            board.state.dark_mode
        );
        board
    }

    /// Read-only view of the whole board for renderers.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Consumes the board, returning its collaborators.
    pub fn into_parts(self) -> (S, P, G) {
        (self.store, self.prompt, self.ids)
    }

    // ---- notes ----

    pub fn set_note_draft(&mut self, text: impl Into<String>) {
        self.state.note_draft = text.into();
    }

    /// Changes the category applied to the next saved note.
    ///
    /// Returns `false` and keeps the current selection for unknown names.
    pub fn select_category(&mut self, name: &str) -> bool {
        if !self.state.has_category(name) {
            return false;
        }
        self.state.selected_category = name.to_string();
        true
    }

    /// Saves the note draft.
    ///
    /// With an edit cursor the edited note keeps its id and position and
    /// takes the draft text and selected category. Otherwise a new note is
    /// prepended. Draft text and category selection reset afterwards.
    pub fn save_note(&mut self) -> SaveOutcome {
        let Some(text) = normalize_text(&self.state.note_draft) else {
            debug!("event=note_save module=board status=ignored reason=blank_text");
            return SaveOutcome::Ignored;
        };
        let category = self.state.selected_category.clone();

        let edited = self.state.editing_note_id.take().and_then(|id| {
            let note = self.state.notes.iter_mut().find(|note| note.id == id)?;
            note.text = text.clone();
            note.category = category.clone();
            Some(id)
        });
        let outcome = match edited {
            Some(id) => SaveOutcome::Updated(id),
            None => {
                let Some(id) = self.fresh_note_id() else {
                    error!("event=note_save module=board status=error reason=id_space_exhausted");
                    return SaveOutcome::Ignored;
                };
                self.state.notes.insert(0, Note::new(id, text, category));
                SaveOutcome::Created(id)
            }
        };

        self.state.note_draft.clear();
        self.state.selected_category = GENERAL_CATEGORY.to_string();
        self.commit(Changes::only(Collection::Notes));

        info!(
            "event=note_save module=board status=ok mode={} note_id={}",
            outcome_mode(outcome),
            outcome_id(outcome).unwrap_or_default()
        );
        outcome
    }

    /// Removes a note; clears edit state if it was being edited.
    ///
    /// Returns whether a note was removed.
    pub fn delete_note(&mut self, id: EntityId) -> bool {
        let before = self.state.notes.len();
        self.state.notes.retain(|note| note.id != id);
        let removed = self.state.notes.len() != before;

        if self.state.editing_note_id == Some(id) {
            self.reset_note_editor();
        }
        self.commit(if removed {
            Changes::only(Collection::Notes)
        } else {
            Changes::NONE
        });

        debug!(
            "event=note_delete module=board status={} note_id={}",
            if removed { "ok" } else { "not_found" },
            id
        );
        removed
    }

    /// Enters edit mode for a note, loading `text` and `category` into the
    /// draft fields. Returns `false` when no note has that id.
    pub fn start_edit_note(&mut self, id: EntityId, text: &str, category: &str) -> bool {
        if self.state.note(id).is_none() {
            return false;
        }
        self.state.editing_note_id = Some(id);
        self.state.note_draft = text.to_string();
        self.state.selected_category = category.to_string();
        self.commit(Changes::NONE);
        true
    }

    pub fn cancel_edit_note(&mut self) {
        self.reset_note_editor();
    }

    // ---- categories ----

    pub fn set_category_draft(&mut self, text: impl Into<String>) {
        self.state.category_draft = text.into();
    }

    /// Appends a category.
    ///
    /// Blank and duplicate (case-sensitive) names are rejected; the reason
    /// is shown through the prompt and returned.
    pub fn add_category(&mut self, name: &str) -> Result<(), CategoryRejection> {
        let Some(name) = normalize_text(name) else {
            return Err(self.reject(CategoryRejection::EmptyName));
        };
        if self.state.has_category(&name) {
            return Err(self.reject(CategoryRejection::AlreadyExists(name)));
        }

        self.state.categories.push(name);
        self.commit(Changes::only(Collection::Categories));
        info!(
            "event=category_add module=board status=ok categories={}",
            self.state.categories.len()
        );
        Ok(())
    }

    /// Adds the pending category draft, clearing it only on success.
    pub fn submit_category_draft(&mut self) -> Result<(), CategoryRejection> {
        let draft = self.state.category_draft.clone();
        self.add_category(&draft)?;
        self.state.category_draft.clear();
        Ok(())
    }

    /// Deletes a category and every note filed under it, after the user
    /// confirms.
    ///
    /// Returns the number of notes removed by the cascade.
    pub fn delete_category(&mut self, name: &str) -> Result<usize, CategoryRejection> {
        if is_general(name) {
            return Err(self.reject(CategoryRejection::Sentinel));
        }
        if !self.state.has_category(name) {
            return Err(self.reject(CategoryRejection::UnknownCategory(name.to_string())));
        }
        if !self.prompt.confirm(&delete_confirmation_message(name)) {
            return Err(self.reject(CategoryRejection::NotConfirmed(name.to_string())));
        }

        self.state.categories.retain(|category| category != name);
        let before = self.state.notes.len();
        self.state.notes.retain(|note| note.category != name);
        let cascaded = before - self.state.notes.len();
        if self.state.selected_category == name {
            self.state.selected_category = GENERAL_CATEGORY.to_string();
        }

        let mut changes = Changes::only(Collection::Categories);
        if cascaded > 0 {
            changes = changes.with(Collection::Notes);
        }
        self.commit(changes);

        info!(
            "event=category_delete module=board status=ok cascaded_notes={}",
            cascaded
        );
        Ok(cascaded)
    }

    // ---- todos ----

    pub fn set_todo_draft(&mut self, text: impl Into<String>) {
        self.state.todo_draft = text.into();
    }

    /// Saves the todo draft.
    ///
    /// With an edit cursor only the edited todo's text changes; `done` and
    /// position are kept. Otherwise a new open todo is prepended.
    pub fn save_todo(&mut self) -> SaveOutcome {
        let Some(text) = normalize_text(&self.state.todo_draft) else {
            debug!("event=todo_save module=board status=ignored reason=blank_text");
            return SaveOutcome::Ignored;
        };

        let edited = self.state.editing_todo_id.take().and_then(|id| {
            let todo = self.state.todos.iter_mut().find(|todo| todo.id == id)?;
            todo.text = text.clone();
            Some(id)
        });
        let outcome = match edited {
            Some(id) => SaveOutcome::Updated(id),
            None => {
                let Some(id) = self.fresh_todo_id() else {
                    error!("event=todo_save module=board status=error reason=id_space_exhausted");
                    return SaveOutcome::Ignored;
                };
                self.state.todos.insert(0, Todo::new(id, text));
                SaveOutcome::Created(id)
            }
        };

        self.state.todo_draft.clear();
        self.commit(Changes::only(Collection::Todos));

        info!(
            "event=todo_save module=board status=ok mode={} todo_id={}",
            outcome_mode(outcome),
            outcome_id(outcome).unwrap_or_default()
        );
        outcome
    }

    /// Removes a todo; clears edit state if it was being edited.
    pub fn delete_todo(&mut self, id: EntityId) -> bool {
        let before = self.state.todos.len();
        self.state.todos.retain(|todo| todo.id != id);
        let removed = self.state.todos.len() != before;

        if self.state.editing_todo_id == Some(id) {
            self.reset_todo_editor();
        }
        self.commit(if removed {
            Changes::only(Collection::Todos)
        } else {
            Changes::NONE
        });

        debug!(
            "event=todo_delete module=board status={} todo_id={}",
            if removed { "ok" } else { "not_found" },
            id
        );
        removed
    }

    /// Flips a todo's `done` flag in place, independent of edit mode.
    ///
    /// Returns the new flag, or `None` when no todo has that id.
    pub fn toggle_done(&mut self, id: EntityId) -> Option<bool> {
        let todo = self.state.todos.iter_mut().find(|todo| todo.id == id)?;
        todo.toggle();
        let done = todo.done;
        self.commit(Changes::only(Collection::Todos));
        debug!("event=todo_toggle module=board status=ok todo_id={id} done={done}");
        Some(done)
    }

    /// Enters edit mode for a todo. Returns `false` when no todo has that id.
    pub fn start_edit_todo(&mut self, id: EntityId, text: &str) -> bool {
        if self.state.todo(id).is_none() {
            return false;
        }
        self.state.editing_todo_id = Some(id);
        self.state.todo_draft = text.to_string();
        true
    }

    pub fn cancel_edit_todo(&mut self) {
        self.reset_todo_editor();
    }

    // ---- view ----

    /// Flips the theme flag and returns the new value.
    pub fn toggle_theme(&mut self) -> bool {
        self.state.dark_mode = !self.state.dark_mode;
        self.commit(Changes::only(Collection::DarkMode));
        self.state.dark_mode
    }

    pub fn select_tab(&mut self, tab: ActiveTab) {
        self.state.active_tab = tab;
    }

    // ---- internals ----

    fn reset_note_editor(&mut self) {
        self.state.editing_note_id = None;
        self.state.note_draft.clear();
        self.state.selected_category = GENERAL_CATEGORY.to_string();
    }

    fn reset_todo_editor(&mut self) {
        self.state.editing_todo_id = None;
        self.state.todo_draft.clear();
    }

    fn reject(&mut self, rejection: CategoryRejection) -> CategoryRejection {
        if rejection.is_user_visible() {
            self.prompt.notify(&rejection.to_string());
        }
        debug!(
            "event=category_change module=board status=rejected reason={}",
            rejection_code(&rejection)
        );
        rejection
    }

    fn fresh_note_id(&mut self) -> Option<EntityId> {
        let taken: Vec<EntityId> = self.state.notes.iter().map(|note| note.id).collect();
        next_free_id(&mut self.ids, &taken)
    }

    fn fresh_todo_id(&mut self) -> Option<EntityId> {
        let taken: Vec<EntityId> = self.state.todos.iter().map(|todo| todo.id).collect();
        next_free_id(&mut self.ids, &taken)
    }

    /// Repairs invariants, then writes every touched collection.
    fn commit(&mut self, changes: Changes) {
        let changes = changes.merge(invariants::repair(&mut self.state));
        debug_assert!(
            invariants::violations(&self.state).is_empty(),
            "board invariants must hold after repair"
        );

        for collection in changes.collections() {
            if let Err(err) = write_collection(&mut self.store, &self.keys, &self.state, collection)
            {
                error!(
                    "event=board_persist module=board status=error collection={} key={} error={}",
                    collection.as_str(),
                    self.keys.key_for(collection),
                    err
                );
            }
        }
    }
}

/// Asks the generator for an id not in `taken`.
///
/// If the generator keeps colliding, falls back to one past the largest
/// taken id, or to the nearest free id below it when that would overflow.
/// Returns `None` only if every id is taken.
fn next_free_id(ids: &mut impl IdGenerator, taken: &[EntityId]) -> Option<EntityId> {
    const MAX_ATTEMPTS: usize = 16;
    for _ in 0..MAX_ATTEMPTS {
        let candidate = ids.next_id();
        if !taken.contains(&candidate) {
            return Some(candidate);
        }
    }
    let Some(max) = taken.iter().copied().max() else {
        return Some(1);
    };
    max.checked_add(1)
        .or_else(|| (EntityId::MIN..max).rev().find(|id| !taken.contains(id)))
}

fn outcome_mode(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Created(_) => "create",
        SaveOutcome::Updated(_) => "update",
        SaveOutcome::Ignored => "ignored",
    }
}

fn outcome_id(outcome: SaveOutcome) -> Option<EntityId> {
    match outcome {
        SaveOutcome::Created(id) | SaveOutcome::Updated(id) => Some(id),
        SaveOutcome::Ignored => None,
    }
}

fn rejection_code(rejection: &CategoryRejection) -> &'static str {
    match rejection {
        CategoryRejection::EmptyName => "empty_name",
        CategoryRejection::AlreadyExists(_) => "already_exists",
        CategoryRejection::Sentinel => "sentinel",
        CategoryRejection::UnknownCategory(_) => "unknown_category",
        CategoryRejection::NotConfirmed(_) => "not_confirmed",
    }
}
