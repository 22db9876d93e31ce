//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical persisted entity (`Task`) and its identity type.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` that is unique within a store.
//! - Hashtags are never stored; they are derived from `Task::text` on demand.

pub mod task;
