//! Stores owning canonical application state.
//!
//! # Responsibility
//! - `TaskStore`: the ordered task collection.
//! - `ThemeStore`: the light/dark preference.
//!
//! # Invariants
//! - Stores are constructed once and handed to consumers explicitly; there is
//!   no global instance.
//! - Lifecycle: construct -> `load` -> ready -> mutate* -> `settle`.

pub mod task_store;
pub mod theme_store;
