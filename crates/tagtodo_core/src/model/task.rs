//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity of the task list.
//! - Generate identities that stay unique under rapid sequential creation.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `text` and `completed` are the only mutable fields, and only the task
//!   store mutates them.
//! - Wire field names are `id`, `text`, `completed`, `createdAt`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ID_RANDOM_SUFFIX_LEN: usize = 8;

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Opaque task identity.
///
/// Stored as a plain JSON string so snapshots written by older clients (with
/// any id shape) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh id.
    ///
    /// Layout: `<epoch_ms><sequence><random>`. The process-wide sequence keeps
    /// ids distinct inside one millisecond; the random suffix keeps them
    /// distinct across process restarts that reuse a millisecond.
    pub fn generate() -> Self {
        let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}{:x}{}",
            now_epoch_ms(),
            sequence,
            &random[..ID_RANDOM_SUFFIX_LEN]
        ))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    text: String,
    completed: bool,
    /// Unix epoch milliseconds.
    created_at: i64,
}

impl Task {
    /// Creates a new open task with a generated id and `created_at = now`.
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed: false,
            created_at: now_epoch_ms(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Creation time in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Copy of this task with `text` replaced; everything else is kept.
    pub(crate) fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Copy of this task with `completed` flipped.
    pub(crate) fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Normalizes user-entered task text at the presentation boundary.
///
/// Returns `None` for blank input, otherwise the trimmed text. The task store
/// accepts any text; callers that take raw input run it through here first.
pub fn normalize_task_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Clocks set before 1970 report `0` instead of failing.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::{normalize_task_text, Task, TaskId};
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique_within_one_millisecond() {
        let ids: HashSet<TaskId> = (0..10_000).map(|_| TaskId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn new_task_starts_open() {
        let task = Task::new("water plants");
        assert!(!task.is_completed());
        assert_eq!(task.text(), "water plants");
        assert!(task.created_at() > 0);
    }

    #[test]
    fn with_text_keeps_identity_and_flags() {
        let task = Task::new("draft").toggled();
        let edited = task.with_text("final");
        assert_eq!(edited.id(), task.id());
        assert_eq!(edited.created_at(), task.created_at());
        assert!(edited.is_completed());
        assert_eq!(edited.text(), "final");
    }

    #[test]
    fn normalize_task_text_trims_and_rejects_blank() {
        assert_eq!(normalize_task_text("  hi  ").as_deref(), Some("hi"));
        assert_eq!(normalize_task_text(" \t\n "), None);
    }
}
