//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate board mutations, invariant repair and persistence.
//! - Keep renderers decoupled from storage details.

pub mod board;
