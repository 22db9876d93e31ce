//! Core domain logic for the hashtag task list.
//! This crate is the single source of truth for task and theme invariants.

pub mod config;
pub mod db;
pub mod edit;
pub mod hashtag;
pub mod logging;
pub mod model;
pub mod persist;
pub mod query;
pub mod storage;
pub mod store;

pub use config::{AppConfig, ConfigError, LogConfig};
pub use edit::{EditError, EditSession};
pub use hashtag::{extract_hashtags, segment_text, TextSegment};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{normalize_task_text, Task, TaskId};
pub use persist::{SettleReport, WriteOutcome};
pub use query::{all_hashtags, completion_summary, filter_tasks, CompletionSummary, TaskFilter};
pub use storage::{
    KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult, TASKS_KEY,
    THEME_KEY,
};
pub use store::task_store::{LoadOutcome, TaskStore, EXAMPLE_TASKS};
pub use store::theme_store::{ThemeMode, ThemeStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
