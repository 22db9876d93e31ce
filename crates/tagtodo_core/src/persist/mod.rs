//! Snapshot persistence between the stores and key-value storage.
//!
//! # Responsibility
//! - Encode/decode the task snapshot wire format.
//! - Run storage reads and full-snapshot writes as background blocking tasks
//!   and hand out awaitable/cancellable handles for them.
//!
//! # Invariants
//! - Every write replaces the whole value for its key.
//! - The persisted value never regresses to an older revision, even though
//!   writes are scheduled independently.

pub mod codec;
mod writer;

pub use writer::{SettleReport, SnapshotWriter, WriteHandle, WriteOutcome};
