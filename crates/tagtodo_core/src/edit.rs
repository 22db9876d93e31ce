//! Edit-sheet workflow over the task store.
//!
//! # Responsibility
//! - Track which task is being edited and its in-progress text.
//! - Commit or discard the draft through the task store.
//!
//! # Invariants
//! - `closed -> editing(task_id) -> closed`; one task at a time per session.
//! - Entering `editing` requires the task to exist in the store.
//! - A blank draft is never saved.

use crate::model::task::{normalize_task_text, TaskId};
use crate::storage::KeyValueStorage;
use crate::store::task_store::TaskStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Edit workflow error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Target task is not in the current snapshot.
    UnknownTask(TaskId),
    /// Another task is already being edited.
    AlreadyEditing(TaskId),
    /// Operation needs an open edit.
    NotEditing,
    /// Draft is empty after trimming.
    EmptyText,
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "task not found: {id}"),
            Self::AlreadyEditing(id) => write!(f, "task {id} is already being edited"),
            Self::NotEditing => write!(f, "no task is being edited"),
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for EditError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Closed,
    Editing {
        task_id: TaskId,
        draft: String,
    },
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the editor on `id`, seeding the draft with the current text.
    pub fn begin<S: KeyValueStorage>(
        &mut self,
        store: &TaskStore<S>,
        id: &TaskId,
    ) -> Result<(), EditError> {
        if let Self::Editing { task_id, .. } = self {
            return Err(EditError::AlreadyEditing(task_id.clone()));
        }
        let task = store
            .get(id)
            .ok_or_else(|| EditError::UnknownTask(id.clone()))?;
        *self = Self::Editing {
            task_id: id.clone(),
            draft: task.text().to_string(),
        };
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        match self {
            Self::Editing { draft, .. } => {
                *draft = text.into();
                Ok(())
            }
            Self::Closed => Err(EditError::NotEditing),
        }
    }

    /// Discards the draft. Closing an already closed session is fine.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Writes the trimmed draft through `store.update` and closes.
    ///
    /// A blank draft leaves the session open. If the task was deleted while
    /// editing, the update is a no-op and the session still closes.
    pub fn save<S: KeyValueStorage>(&mut self, store: &mut TaskStore<S>) -> Result<TaskId, EditError> {
        let Self::Editing { task_id, draft } = self else {
            return Err(EditError::NotEditing);
        };
        let text = normalize_task_text(draft).ok_or(EditError::EmptyText)?;
        let task_id = task_id.clone();
        store.update(&task_id, text);
        info!("event=task_edit module=edit status=ok task_id={task_id}");
        *self = Self::Closed;
        Ok(task_id)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Editing { task_id, .. } => Some(task_id),
            Self::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Editing { draft, .. } => Some(draft.as_str()),
            Self::Closed => None,
        }
    }
}
