//! Canonical task collection with write-through persistence.
//!
//! # Responsibility
//! - Own the ordered task snapshot and every mutation of it.
//! - Mirror each mutation to storage as a full-snapshot background write.
//! - Reconcile the in-memory snapshot with the asynchronous initial load.
//!
//! # Invariants
//! - Ids are unique; insertion order is display order.
//! - Each mutation replaces the snapshot wholesale; readers holding an older
//!   `Arc<[Task]>` never observe a partial update.
//! - Mutations on unknown ids are no-ops and schedule no write.
//! - No write is scheduled before `load` completes. Mutations issued while
//!   loading are journaled and replayed on top of the loaded snapshot.

use crate::model::task::{Task, TaskId};
use crate::persist::codec::{decode_tasks, encode_tasks};
use crate::persist::{SettleReport, SnapshotWriter};
use crate::query::{all_hashtags, completion_summary, filter_tasks, CompletionSummary, TaskFilter};
use crate::storage::{KeyValueStorage, TASKS_KEY};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// Example tasks offered on a first run, before anything was ever stored.
pub const EXAMPLE_TASKS: [&str; 3] = [
    "Buy #banana from the grocery store",
    "Give mother the banana for kitchen",
    "Drink #banana shake in the evening",
];

/// Result of the initial snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored snapshot with this many tasks was read.
    Loaded(usize),
    /// Nothing was stored yet (first run).
    Empty,
    /// Storage could not be read or decoded; started from an empty list.
    Recovered,
    /// `load` had already completed earlier.
    AlreadyLoaded,
}

#[derive(Debug, Clone)]
enum TaskCommand {
    Create(Task),
    Update { id: TaskId, text: String },
    Toggle(TaskId),
    Delete(TaskId),
    ClearCompleted,
    ClearAll,
}

impl TaskCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Toggle(_) => "toggle",
            Self::Delete(_) => "delete",
            Self::ClearCompleted => "clear_completed",
            Self::ClearAll => "clear_all",
        }
    }

    /// Applies this command to `tasks`; `None` when nothing would change.
    fn apply(&self, tasks: &[Task]) -> Option<Vec<Task>> {
        match self {
            Self::Create(task) => {
                if tasks.iter().any(|existing| existing.id() == task.id()) {
                    return None;
                }
                let mut next = Vec::with_capacity(tasks.len() + 1);
                next.extend_from_slice(tasks);
                next.push(task.clone());
                Some(next)
            }
            Self::Update { id, text } => {
                replace_one(tasks, id, |task| task.with_text(text.as_str()))
            }
            Self::Toggle(id) => replace_one(tasks, id, Task::toggled),
            Self::Delete(id) => {
                let position = tasks.iter().position(|task| task.id() == id)?;
                let mut next = tasks.to_vec();
                next.remove(position);
                Some(next)
            }
            Self::ClearCompleted => {
                let next: Vec<Task> = tasks
                    .iter()
                    .filter(|task| !task.is_completed())
                    .cloned()
                    .collect();
                (next.len() != tasks.len()).then_some(next)
            }
            Self::ClearAll => (!tasks.is_empty()).then(Vec::new),
        }
    }
}

fn replace_one(tasks: &[Task], id: &TaskId, edit: impl FnOnce(&Task) -> Task) -> Option<Vec<Task>> {
    let position = tasks.iter().position(|task| task.id() == id)?;
    let mut next = tasks.to_vec();
    next[position] = edit(&tasks[position]);
    Some(next)
}

enum Phase {
    Loading { journal: Vec<TaskCommand> },
    Ready,
}

/// Single authoritative task collection.
pub struct TaskStore<S: KeyValueStorage> {
    tasks: Arc<[Task]>,
    phase: Phase,
    /// Set when `load` found no stored snapshot at all.
    first_run: bool,
    writer: SnapshotWriter<S>,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Creates an empty store in the loading state.
    ///
    /// Background storage I/O is spawned on `runtime`.
    pub fn new(storage: Arc<S>, runtime: Handle) -> Self {
        Self {
            tasks: Arc::from(Vec::new()),
            phase: Phase::Loading {
                journal: Vec::new(),
            },
            first_run: false,
            writer: SnapshotWriter::new(storage, TASKS_KEY, runtime),
        }
    }

    /// Reads the persisted snapshot and leaves the loading state.
    ///
    /// Read or decode failures are logged and treated as an empty list.
    /// Mutations journaled while loading are replayed on the loaded snapshot
    /// and persisted with a single write.
    pub async fn load(&mut self) -> LoadOutcome {
        if matches!(self.phase, Phase::Ready) {
            return LoadOutcome::AlreadyLoaded;
        }

        let started_at = Instant::now();
        let (loaded, outcome) = match self.writer.read().await {
            Ok(Some(value)) => match decode_tasks(&value) {
                Ok(tasks) => {
                    let count = tasks.len();
                    (tasks, LoadOutcome::Loaded(count))
                }
                Err(err) => {
                    error!(
                        "event=tasks_load module=store status=error error_code=decode_failed error={err}"
                    );
                    (Vec::new(), LoadOutcome::Recovered)
                }
            },
            Ok(None) => (Vec::new(), LoadOutcome::Empty),
            Err(err) => {
                error!("event=tasks_load module=store status=error error_code=read_failed error={err}");
                (Vec::new(), LoadOutcome::Recovered)
            }
        };

        let journal = match std::mem::replace(&mut self.phase, Phase::Ready) {
            Phase::Loading { journal } => journal,
            Phase::Ready => Vec::new(),
        };
        let replayed = journal.len();
        let mut tasks = loaded;
        for command in &journal {
            if let Some(next) = command.apply(&tasks) {
                tasks = next;
            }
        }
        self.tasks = Arc::from(tasks);
        self.first_run = outcome == LoadOutcome::Empty;
        if replayed > 0 {
            self.schedule_write();
        }

        info!(
            "event=tasks_load module=store status=ok outcome={outcome:?} task_count={} replayed={replayed} duration_ms={}",
            self.tasks.len(),
            started_at.elapsed().as_millis()
        );
        outcome
    }

    /// Appends a new open task and returns it.
    ///
    /// The store does not trim or reject `text`; see
    /// [`crate::model::task::normalize_task_text`] for the boundary check.
    pub fn create(&mut self, text: impl Into<String>) -> Task {
        let task = Task::new(text);
        self.dispatch(TaskCommand::Create(task.clone()));
        task
    }

    /// Replaces the text of one task; no-op for unknown ids.
    pub fn update(&mut self, id: &TaskId, text: impl Into<String>) {
        self.dispatch(TaskCommand::Update {
            id: id.clone(),
            text: text.into(),
        });
    }

    /// Flips `completed` of one task; no-op for unknown ids.
    pub fn toggle_completed(&mut self, id: &TaskId) {
        self.dispatch(TaskCommand::Toggle(id.clone()));
    }

    /// Removes one task; no-op for unknown ids.
    pub fn delete(&mut self, id: &TaskId) {
        self.dispatch(TaskCommand::Delete(id.clone()));
    }

    /// Removes every completed task.
    pub fn clear_completed(&mut self) {
        self.dispatch(TaskCommand::ClearCompleted);
    }

    /// Removes every task.
    pub fn clear_all(&mut self) {
        self.dispatch(TaskCommand::ClearAll);
    }

    /// Appends [`EXAMPLE_TASKS`] once, when `load` found no stored snapshot
    /// and the list is still empty.
    ///
    /// A stored empty list (`[]`) is a user choice and is never seeded.
    /// Returns the number of tasks added. Does nothing before `load`.
    pub fn seed_examples_on_first_run(&mut self) -> usize {
        if !self.first_run || self.is_loading() || !self.tasks.is_empty() {
            return 0;
        }
        self.first_run = false;
        for text in EXAMPLE_TASKS {
            self.create(text);
        }
        info!(
            "event=tasks_seed module=store status=ok task_count={}",
            EXAMPLE_TASKS.len()
        );
        EXAMPLE_TASKS.len()
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<[Task]> {
        Arc::clone(&self.tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether the initial `load` has not completed yet.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn completion_summary(&self) -> CompletionSummary {
        completion_summary(&self.tasks)
    }

    pub fn all_hashtags(&self) -> Vec<String> {
        all_hashtags(&self.tasks)
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        filter_tasks(&self.tasks, filter)
    }

    /// Number of scheduled writes not yet awaited.
    pub fn pending_writes(&self) -> usize {
        self.writer.pending()
    }

    /// Waits until every scheduled write has settled.
    pub async fn settle(&mut self) -> SettleReport {
        self.writer.settle().await
    }

    /// Cancels scheduled writes that have not started.
    pub fn abort_pending_writes(&mut self) {
        self.writer.abort_pending();
    }

    fn dispatch(&mut self, command: TaskCommand) {
        let changed = match command.apply(&self.tasks) {
            Some(next) => {
                self.tasks = Arc::from(next);
                true
            }
            None => false,
        };

        if let Phase::Loading { journal } = &mut self.phase {
            warn!(
                "event=task_mutation module=store status=deferred op={} journal_len={}",
                command.name(),
                journal.len() + 1
            );
            journal.push(command);
            return;
        }

        if changed {
            self.schedule_write();
        } else {
            debug!(
                "event=task_mutation module=store status=skip op={} reason=no_change",
                command.name()
            );
        }
    }

    fn schedule_write(&mut self) {
        let snapshot = Arc::clone(&self.tasks);
        self.writer.schedule(move || encode_tasks(&snapshot));
    }
}
