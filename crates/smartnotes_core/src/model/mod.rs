//! Board domain model: notes, categories and todos.
//!
//! # Responsibility
//! - Define the plain data records owned by the note board.
//! - Keep the serialized field names identical to the persisted payloads.
//!
//! # Invariants
//! - Every note and todo is identified by an `EntityId` that never changes.
//! - Stored text is always trimmed and non-empty.
//! - The `General` category always exists.

pub mod board;
pub mod category;
pub mod note;
pub mod todo;

/// Identifier shared by notes and todos.
///
/// Serialized as a JSON number; values are issued by an `IdGenerator`.
pub type EntityId = i64;

/// Trims user input and returns `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn normalize_text_trims_both_ends() {
        assert_eq!(normalize_text("  buy milk ").as_deref(), Some("buy milk"));
    }

    #[test]
    fn normalize_text_rejects_whitespace_only() {
        assert_eq!(normalize_text(" \t\n "), None);
        assert_eq!(normalize_text(""), None);
    }
}
