//! Per-task progress state and the read model handed to UI layers.
//!
//! One writer (the orchestrator) and any number of readers. Readers get a
//! copied [`ProgressSnapshot`]; they never observe a half-applied update.

use std::sync::{Mutex, RwLock, mpsc};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::{TaskDefinition, TaskKey, TaskStatus};

/// Events buffered per subscriber; further events are dropped until it drains.
pub const SUBSCRIPTION_BUFFER: usize = 1024;

/// Mutable progress of one task within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub total: usize,
    /// Records confirmed present, whether created or skipped.
    pub completed: usize,
    /// Subset of `completed` that already existed.
    pub skipped: usize,
    pub status: TaskStatus,
    pub current_item: Option<String>,
    pub error: Option<String>,
}

impl TaskProgress {
    pub fn pending(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            skipped: 0,
            status: TaskStatus::Pending,
            current_item: None,
            error: None,
        }
    }
}

/// Partial update merged into one task's progress.
///
/// Unset fields are left untouched. `current_item` and `error` are doubly
/// optional so they can be cleared explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub total: Option<usize>,
    pub completed: Option<usize>,
    pub skipped: Option<usize>,
    pub status: Option<TaskStatus>,
    pub current_item: Option<Option<String>>,
    pub error: Option<Option<String>>,
}

impl ProgressUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn counts(mut self, completed: usize, skipped: usize) -> Self {
        self.completed = Some(completed);
        self.skipped = Some(skipped);
        self
    }

    pub fn current_item(mut self, item: Option<String>) -> Self {
        self.current_item = Some(item);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    fn apply_to(self, progress: &mut TaskProgress) {
        if let Some(v) = self.total {
            progress.total = v;
        }
        if let Some(v) = self.completed {
            progress.completed = v;
        }
        if let Some(v) = self.skipped {
            progress.skipped = v;
        }
        if let Some(v) = self.status {
            progress.status = v;
        }
        if let Some(v) = self.current_item {
            progress.current_item = v;
        }
        if let Some(v) = self.error {
            progress.error = v;
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("unknown task: {0}")]
    UnknownTask(TaskKey),
}

/// One task as seen by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub key: TaskKey,
    pub label: String,
    pub position: usize,
    #[serde(flatten)]
    pub progress: TaskProgress,
}

/// Immutable read of every task plus aggregate counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub tasks: Vec<TaskSnapshot>,
    pub total_completed_records: usize,
    pub total_target_records: usize,
    /// `total_completed_records / total_target_records` as a ratio in
    /// `0.0..=1.0`; `0.0` when there is nothing to seed.
    pub percent_complete: f64,
    pub has_error: bool,
}

impl ProgressSnapshot {
    fn from_tasks(tasks: Vec<TaskSnapshot>) -> Self {
        let total_completed_records = tasks.iter().map(|t| t.progress.completed).sum();
        let total_target_records: usize = tasks.iter().map(|t| t.progress.total).sum();
        let percent_complete = if total_target_records == 0 {
            0.0
        } else {
            total_completed_records as f64 / total_target_records as f64
        };
        let has_error = tasks.iter().any(|t| t.progress.status == TaskStatus::Error);

        Self {
            tasks,
            total_completed_records,
            total_target_records,
            percent_complete,
            has_error,
        }
    }

    pub fn task(&self, key: &str) -> Option<&TaskSnapshot> {
        self.tasks.iter().find(|t| t.key == key)
    }

    /// Every task reached `Done`.
    pub fn all_done(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.progress.status == TaskStatus::Done)
    }

    /// First task in registry order that is in `Error`.
    pub fn failed_task(&self) -> Option<&TaskSnapshot> {
        self.tasks.iter().find(|t| t.progress.status == TaskStatus::Error)
    }

    pub fn keys_with_status(&self, status: TaskStatus) -> Vec<TaskKey> {
        self.tasks
            .iter()
            .filter(|t| t.progress.status == status)
            .map(|t| t.key.clone())
            .collect()
    }
}

/// Pushed to subscribers after every applied update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub key: TaskKey,
    pub progress: TaskProgress,
}

/// Receiving end of [`ProgressTracker::subscribe`].
#[derive(Debug)]
pub struct ProgressSubscription {
    receiver: mpsc::Receiver<ProgressEvent>,
}

impl ProgressSubscription {
    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Result<ProgressEvent, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ProgressEvent, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything queued so far, without blocking.
    pub fn drain(&self) -> Vec<ProgressEvent> {
        self.receiver.try_iter().collect()
    }
}

/// Progress state container keyed by task.
///
/// Does not validate transitions; the orchestrator is the only writer and is
/// responsible for issuing valid ones.
#[derive(Debug)]
pub struct ProgressTracker {
    definitions: Vec<TaskDefinition>,
    state: RwLock<Vec<TaskProgress>>,
    subscribers: Mutex<Vec<mpsc::SyncSender<ProgressEvent>>>,
}

impl ProgressTracker {
    /// Create a tracker with every task `Pending`.
    pub fn new(definitions: Vec<TaskDefinition>) -> Self {
        let state = definitions
            .iter()
            .map(|d| TaskProgress::pending(d.expected_record_count))
            .collect();
        Self {
            definitions,
            state: RwLock::new(state),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn definitions(&self) -> &[TaskDefinition] {
        &self.definitions
    }

    /// Put every task back to `Pending` with zero counts.
    pub fn reset(&self) {
        let fresh: Vec<TaskProgress> = self
            .definitions
            .iter()
            .map(|d| TaskProgress::pending(d.expected_record_count))
            .collect();
        {
            let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
            *state = fresh.clone();
        }
        for (definition, progress) in self.definitions.iter().zip(fresh) {
            self.publish(ProgressEvent {
                key: definition.key.clone(),
                progress,
            });
        }
    }

    /// Merge `update` into the task identified by `key`.
    pub fn update(
        &self,
        key: &TaskKey,
        update: ProgressUpdate,
    ) -> Result<TaskProgress, TrackerError> {
        let index = self
            .index_of(key)
            .ok_or_else(|| TrackerError::UnknownTask(key.clone()))?;

        let updated = {
            let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
            let progress = &mut state[index];
            update.apply_to(progress);
            progress.clone()
        };

        self.publish(ProgressEvent {
            key: key.clone(),
            progress: updated.clone(),
        });
        Ok(updated)
    }

    pub fn get(&self, key: &TaskKey) -> Option<TaskProgress> {
        let index = self.index_of(key)?;
        let state = self.state.read().unwrap_or_else(|p| p.into_inner());
        state.get(index).cloned()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.state.read().unwrap_or_else(|p| p.into_inner());
        let tasks = self
            .definitions
            .iter()
            .zip(state.iter())
            .map(|(d, p)| TaskSnapshot {
                key: d.key.clone(),
                label: d.label.clone(),
                position: d.position,
                progress: p.clone(),
            })
            .collect();
        ProgressSnapshot::from_tasks(tasks)
    }

    /// Receive a [`ProgressEvent`] for every subsequent update.
    ///
    /// At most [`SUBSCRIPTION_BUFFER`] events are queued; a subscriber that
    /// falls behind misses events and should re-read [`snapshot`](Self::snapshot).
    pub fn subscribe(&self) -> ProgressSubscription {
        let (tx, rx) = mpsc::sync_channel(SUBSCRIPTION_BUFFER);

        // A poisoned lock still yields a subscription; it just stays silent.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        ProgressSubscription { receiver: rx }
    }

    fn index_of(&self, key: &TaskKey) -> Option<usize> {
        self.definitions.iter().position(|d| &d.key == key)
    }

    fn publish(&self, event: ProgressEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop dead subscribers; full ones just miss this event.
            subs.retain(|tx| match tx.try_send(event.clone()) {
                Ok(()) | Err(mpsc::TrySendError::Full(_)) => true,
                Err(mpsc::TrySendError::Disconnected(_)) => false,
            });
        }
    }
}
