//! Category names and the rejection reasons for category edits.
//!
//! Categories are plain strings. `General` is the sentinel: default target
//! for new notes, fallback for notes whose category disappeared, and never
//! removable.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel category that always exists.
pub const GENERAL_CATEGORY: &str = "General";

/// Returns the category list used when nothing was persisted yet.
pub fn default_categories() -> Vec<String> {
    vec![GENERAL_CATEGORY.to_string()]
}

/// Returns whether `name` is the sentinel category.
pub fn is_general(name: &str) -> bool {
    name == GENERAL_CATEGORY
}

/// Reason a category add/delete request left the board unchanged.
///
/// `Display` renders the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRejection {
    /// Name was empty after trimming.
    EmptyName,
    /// A category with the exact same name exists (case-sensitive).
    AlreadyExists(String),
    /// The sentinel category cannot be deleted.
    Sentinel,
    /// No category with that name exists.
    UnknownCategory(String),
    /// The user declined the delete confirmation.
    NotConfirmed(String),
}

impl CategoryRejection {
    /// Whether the rejection must be surfaced to the user through a notify prompt.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::AlreadyExists(_) | Self::Sentinel
        )
    }
}

impl Display for CategoryRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty."),
            Self::AlreadyExists(name) => write!(f, "Category \"{name}\" already exists."),
            Self::Sentinel => write!(
                f,
                "The base category \"{GENERAL_CATEGORY}\" cannot be deleted."
            ),
            Self::UnknownCategory(name) => write!(f, "Category \"{name}\" does not exist."),
            Self::NotConfirmed(name) => write!(f, "Deleting category \"{name}\" was cancelled."),
        }
    }
}

impl Error for CategoryRejection {}

/// Confirmation question asked before a category and its notes are removed.
pub fn delete_confirmation_message(name: &str) -> String {
    format!("Delete category \"{name}\" and all notes in it?")
}
