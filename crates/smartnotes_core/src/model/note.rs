//! Note record.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Free-text note filed under one category.
///
/// Serialized as `{id, text, category}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    pub text: String,
    pub category: String,
}

impl Note {
    pub fn new(id: EntityId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Note;

    #[test]
    fn note_serializes_with_flat_field_names() {
        let note = Note::new(7, "buy milk", "General");
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, r#"{"id":7,"text":"buy milk","category":"General"}"#);
    }
}
