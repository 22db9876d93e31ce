//! Background snapshot writer.
//!
//! # Responsibility
//! - Schedule full-value writes for one storage key without blocking the
//!   caller.
//! - Track in-flight writes so callers can await or cancel them.
//!
//! # Invariants
//! - Revisions increase by one per scheduled write.
//! - A write whose revision is not newer than the last persisted revision is
//!   skipped; the persisted value is therefore always the newest snapshot
//!   that completed.
//! - Write failures are logged and reported through `WriteOutcome`, never
//!   propagated to the mutating caller.

use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, error};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Pending handles are pruned of finished writes once this many accumulate.
const PENDING_PRUNE_THRESHOLD: usize = 64;

/// Final state of one scheduled write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Value reached storage.
    Written,
    /// A newer revision had already been persisted.
    Skipped,
    /// Encoding or storage failed; the error was logged.
    Failed,
    /// Cancelled before it started.
    Aborted,
}

/// Awaitable, cancellable handle for one scheduled write.
#[derive(Debug)]
pub struct WriteHandle {
    revision: u64,
    join: JoinHandle<WriteOutcome>,
}

impl WriteHandle {
    /// Revision number carried by this write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancels the write if it has not started yet.
    ///
    /// A write already running on a blocking thread completes normally.
    pub fn abort(&self) {
        self.join.abort();
    }

    /// Waits for the write to settle.
    pub async fn wait(self) -> WriteOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => WriteOutcome::Aborted,
            Err(err) => {
                error!(
                    "event=snapshot_write module=persist status=error revision={} error_code=write_task_panicked error={err}",
                    self.revision
                );
                WriteOutcome::Failed
            }
        }
    }
}

/// Tally of writes awaited by [`SnapshotWriter::settle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub aborted: usize,
}

impl SettleReport {
    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written += 1,
            WriteOutcome::Skipped => self.skipped += 1,
            WriteOutcome::Failed => self.failed += 1,
            WriteOutcome::Aborted => self.aborted += 1,
        }
    }

    /// Total number of writes awaited.
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed + self.aborted
    }
}

/// Writes values for a single storage key on tokio's blocking pool.
pub struct SnapshotWriter<S: KeyValueStorage> {
    storage: Arc<S>,
    key: &'static str,
    runtime: Handle,
    last_persisted: Arc<Mutex<u64>>,
    next_revision: u64,
    pending: Vec<WriteHandle>,
}

impl<S: KeyValueStorage> SnapshotWriter<S> {
    pub fn new(storage: Arc<S>, key: &'static str, runtime: Handle) -> Self {
        Self {
            storage,
            key,
            runtime,
            last_persisted: Arc::new(Mutex::new(0)),
            next_revision: 1,
            pending: Vec::new(),
        }
    }

    /// Reads the current value for this key on the blocking pool.
    pub async fn read(&self) -> StorageResult<Option<String>> {
        let storage = Arc::clone(&self.storage);
        let key = self.key;
        self.runtime
            .spawn_blocking(move || storage.get_item(key))
            .await
            .map_err(|err| StorageError::Join(err.to_string()))?
    }

    /// Schedules a write of the value produced by `encode`.
    ///
    /// `encode` runs on the blocking thread, so callers can hand over a cheap
    /// snapshot handle instead of a pre-rendered string.
    pub fn schedule<F>(&mut self, encode: F) -> u64
    where
        F: FnOnce() -> StorageResult<String> + Send + 'static,
    {
        let revision = self.next_revision;
        self.next_revision += 1;

        if self.pending.len() >= PENDING_PRUNE_THRESHOLD {
            self.pending.retain(|handle| !handle.is_finished());
        }

        let storage = Arc::clone(&self.storage);
        let last_persisted = Arc::clone(&self.last_persisted);
        let key = self.key;
        let join = self.runtime.spawn_blocking(move || {
            write_if_newer(storage.as_ref(), key, revision, &last_persisted, encode)
        });
        self.pending.push(WriteHandle { revision, join });
        debug!("event=snapshot_write module=persist status=scheduled key={key} revision={revision}");
        revision
    }

    /// Number of writes not yet awaited.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Awaits every pending write in scheduling order.
    pub async fn settle(&mut self) -> SettleReport {
        let mut report = SettleReport::default();
        for handle in std::mem::take(&mut self.pending) {
            report.record(handle.wait().await);
        }
        report
    }

    /// Cancels every pending write that has not started.
    pub fn abort_pending(&mut self) {
        for handle in &self.pending {
            handle.abort();
        }
    }
}

fn write_if_newer<S, F>(
    storage: &S,
    key: &str,
    revision: u64,
    last_persisted: &Mutex<u64>,
    encode: F,
) -> WriteOutcome
where
    S: KeyValueStorage + ?Sized,
    F: FnOnce() -> StorageResult<String>,
{
    // Held across the write so two writes for this key never interleave.
    let Ok(mut last) = last_persisted.lock() else {
        error!(
            "event=snapshot_write module=persist status=error key={key} revision={revision} error_code=gate_poisoned"
        );
        return WriteOutcome::Failed;
    };

    if *last >= revision {
        debug!(
            "event=snapshot_write module=persist status=skip key={key} revision={revision} persisted_revision={}",
            *last
        );
        return WriteOutcome::Skipped;
    }

    match encode().and_then(|value| storage.set_item(key, &value)) {
        Ok(()) => {
            *last = revision;
            debug!("event=snapshot_write module=persist status=ok key={key} revision={revision}");
            WriteOutcome::Written
        }
        Err(err) => {
            error!(
                "event=snapshot_write module=persist status=error key={key} revision={revision} error_code=write_failed error={err}"
            );
            WriteOutcome::Failed
        }
    }
}
