//! Todo record.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Checklist item.
///
/// Serialized as `{id, text, done}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: EntityId,
    pub text: String,
    pub done: bool,
}

impl Todo {
    /// Creates an open (not done) todo.
    pub fn new(id: EntityId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }

    /// Flips the completion flag; nothing else changes.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

#[cfg(test)]
mod tests {
    use super::Todo;

    #[test]
    fn new_todo_starts_open() {
        let todo = Todo::new(1, "a");
        assert!(!todo.done);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut todo = Todo::new(1, "a");
        todo.toggle();
        assert!(todo.done);
        todo.toggle();
        assert!(!todo.done);
        assert_eq!(todo.text, "a");
        assert_eq!(todo.id, 1);
    }
}
