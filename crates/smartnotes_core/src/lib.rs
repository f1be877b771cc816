//! Core domain logic for SmartNotes.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod ids;
pub mod invariants;
pub mod logging;
pub mod model;
pub mod persist;
pub mod prompt;
pub mod service;
pub mod store;

pub use ids::{ClockIdGenerator, IdGenerator, SequentialIdGenerator};
pub use invariants::Violation;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::board::{ActiveTab, BoardSnapshot, BoardState, CategoryGroup};
pub use model::category::{CategoryRejection, GENERAL_CATEGORY};
pub use model::note::Note;
pub use model::todo::Todo;
pub use model::EntityId;
pub use persist::{Changes, Collection, StorageKeys};
pub use prompt::{FixedPrompt, Prompt, RecordingPrompt};
pub use service::board::{NoteBoard, SaveOutcome};
pub use store::{KeyValueStore, MemoryStore, SqliteKvStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
