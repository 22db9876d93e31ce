//! Task snapshot wire format.
//!
//! The value stored under `@todos` is a JSON array of objects with the fields
//! `id` (string), `text` (string), `completed` (boolean) and `createdAt`
//! (number, epoch milliseconds), in display order.

use crate::model::task::Task;
use crate::storage::{StorageError, StorageResult};
use log::warn;
use std::collections::HashSet;

/// Encodes an ordered task collection.
pub fn encode_tasks(tasks: &[Task]) -> StorageResult<String> {
    serde_json::to_string(tasks).map_err(StorageError::Serialize)
}

/// Decodes an ordered task collection.
///
/// Entries repeating an id already seen are dropped so the decoded collection
/// keeps ids unique; the first occurrence wins.
pub fn decode_tasks(value: &str) -> StorageResult<Vec<Task>> {
    let decoded: Vec<Task> = serde_json::from_str(value).map_err(StorageError::Deserialize)?;
    let mut seen = HashSet::with_capacity(decoded.len());
    let mut tasks = Vec::with_capacity(decoded.len());
    let mut dropped = 0usize;
    for task in decoded {
        if seen.insert(task.id().clone()) {
            tasks.push(task);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("event=snapshot_decode module=persist status=repaired duplicate_ids_dropped={dropped}");
    }
    Ok(tasks)
}
