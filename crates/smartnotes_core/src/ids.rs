//! Entity id generation.
//!
//! # Invariants
//! - A generator never returns the same id twice.
//! - Ids are strictly increasing, so newer entities sort after older ones.

use crate::model::EntityId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of fresh note/todo ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> EntityId;
}

/// Wall-clock ids in epoch milliseconds, bumped past the last issued id
/// when two calls land in the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct ClockIdGenerator {
    last_issued: EntityId,
}

impl ClockIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for ClockIdGenerator {
    fn next_id(&mut self) -> EntityId {
        let now = now_epoch_ms();
        let id = if now > self.last_issued {
            now
        } else {
            self.last_issued.saturating_add(1)
        };
        self.last_issued = id;
        id
    }
}

/// Deterministic counter, starting at a caller-chosen value.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: EntityId,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: EntityId) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

fn now_epoch_ms() -> EntityId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| EntityId::try_from(elapsed.as_millis()).unwrap_or(EntityId::MAX))
        .unwrap_or(0)
}
