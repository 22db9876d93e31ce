//! Derived read-only views over a task snapshot.
//!
//! # Responsibility
//! - Completion counts, hashtag union and search/hashtag filtering.
//!
//! # Invariants
//! - Every view is a pure function of (snapshot, filter inputs); nothing is
//!   cached between calls.
//! - Filtered output keeps snapshot order.

use crate::hashtag::{extract_hashtags, has_all_hashtags};
use crate::model::task::Task;
use std::collections::{BTreeSet, HashSet};

/// Completed/total counts over the full, unfiltered snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionSummary {
    pub completed: usize,
    pub total: usize,
}

impl CompletionSummary {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}

/// Counts completed tasks.
pub fn completion_summary(tasks: &[Task]) -> CompletionSummary {
    CompletionSummary {
        completed: tasks.iter().filter(|task| task.is_completed()).count(),
        total: tasks.len(),
    }
}

/// Union of the hashtags of every task, each tag once, first-seen order.
pub fn all_hashtags(tasks: &[Task]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in tasks.iter().flat_map(|task| extract_hashtags(task.text())) {
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

/// Search and hashtag filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// Tags a task must all carry (AND); empty matches everything.
    pub active_hashtags: BTreeSet<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_hashtag(mut self, tag: impl Into<String>) -> Self {
        self.active_hashtags.insert(tag.into());
        self
    }

    /// Adds `tag` when absent, removes it when present.
    ///
    /// Returns whether the tag is active afterwards.
    pub fn toggle_hashtag(&mut self, tag: &str) -> bool {
        if self.active_hashtags.remove(tag) {
            false
        } else {
            self.active_hashtags.insert(tag.to_string());
            true
        }
    }

    /// Resets search text and active tags.
    pub fn clear(&mut self) {
        self.search.clear();
        self.active_hashtags.clear();
    }

    /// Whether any input would narrow the result.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.active_hashtags.is_empty()
    }

    /// Whether `task` passes both the hashtag and the search filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_hashtags(task) && self.matches_search(task)
    }

    fn matches_hashtags(&self, task: &Task) -> bool {
        self.active_hashtags.is_empty() || has_all_hashtags(task.text(), &self.active_hashtags)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        task.text()
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }
}

/// Tasks passing `filter`, in snapshot order.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{all_hashtags, completion_summary, filter_tasks, CompletionSummary, TaskFilter};
    use crate::model::task::Task;

    fn tasks(texts: &[&str]) -> Vec<Task> {
        texts.iter().map(|text| Task::new(*text)).collect()
    }

    #[test]
    fn hashtag_filter_requires_every_active_tag() {
        let all = tasks(&["#a #b", "#a", "#b"]);
        let filter = TaskFilter::new().with_hashtag("a").with_hashtag("b");
        let result = filter_tasks(&all, &filter);
        assert_eq!(result, vec![all[0].clone()]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let all = tasks(&["Buy #banana", "walk dog"]);
        let result = filter_tasks(&all, &TaskFilter::new().with_search("BANANA"));
        assert_eq!(result, vec![all[0].clone()]);
    }

    #[test]
    fn empty_filter_passes_everything_in_order() {
        let all = tasks(&["three", "one", "two"]);
        assert_eq!(filter_tasks(&all, &TaskFilter::new()), all);
    }

    #[test]
    fn search_and_hashtags_combine() {
        let all = tasks(&["milk #shop", "bread #shop", "milk #home"]);
        let filter = TaskFilter::new().with_search("milk").with_hashtag("shop");
        assert_eq!(filter_tasks(&all, &filter), vec![all[0].clone()]);
    }

    #[test]
    fn active_tags_match_exact_case() {
        let all = tasks(&["#Work item"]);
        let filter = TaskFilter::new().with_hashtag("work");
        assert!(filter_tasks(&all, &filter).is_empty());
    }

    #[test]
    fn toggle_hashtag_adds_then_removes() {
        let mut filter = TaskFilter::new();
        assert!(filter.toggle_hashtag("trip"));
        assert!(filter.is_active());
        assert!(!filter.toggle_hashtag("trip"));
        assert!(!filter.is_active());
    }

    #[test]
    fn clear_resets_inputs() {
        let mut filter = TaskFilter::new().with_search("x").with_hashtag("y");
        filter.clear();
        assert_eq!(filter, TaskFilter::new());
    }

    #[test]
    fn summary_counts_whole_snapshot() {
        let mut all = tasks(&["a", "b", "c"]);
        all[1] = all[1].toggled();
        let summary = completion_summary(&all);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.remaining(), 2);
    }

    #[test]
    fn remaining_never_underflows() {
        let summary = CompletionSummary {
            completed: 2,
            total: 1,
        };
        assert_eq!(summary.remaining(), 0);
    }

    #[test]
    fn all_hashtags_is_a_first_seen_union() {
        let all = tasks(&["#b #a", "#a #c", "none"]);
        assert_eq!(
            all_hashtags(&all),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }
}
