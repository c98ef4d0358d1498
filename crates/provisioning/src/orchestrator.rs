//! Provisioning orchestrator: runs the registry's seeders for one tenant.
//!
//! ## Run lifecycle
//!
//! ```text
//! new_run(tenant) ──▶ run() ──▶ every task Done ──────────▶ caller finalizes
//!                        │
//!                        └──▶ task k Error, k+1.. Pending
//!                                   └──▶ retry(k) ──▶ resume()
//! ```
//!
//! Tasks run strictly sequentially in registry order and the first failure
//! halts the run. Nothing is retried automatically and the orchestrator never
//! finalizes the tenant; both are caller decisions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use coldstore_core::TenantId;

use crate::progress::{ProgressSnapshot, ProgressTracker, ProgressUpdate};
use crate::registry::{TaskEntry, TaskRegistry};
use crate::seeder::{ProgressSink, SeedOutcome, SeedingFailure};
use crate::task::{TaskKey, TaskStatus};
use crate::tenant::TenantProfileUpdater;

/// Behaviour switches for the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorOptions {
    /// After a successful `retry`, continue with the remaining pending tasks.
    ///
    /// Off by default: a retry only touches the task it names.
    pub advance_after_retry: bool,
}

/// Caller-owned state of one provisioning run.
///
/// Holds the tenant and a shared tracker; clone the tracker handle to let a UI
/// poll or subscribe while the run is in progress.
#[derive(Debug, Clone)]
pub struct ProvisioningRun {
    tenant_id: TenantId,
    tracker: Arc<ProgressTracker>,
}

impl ProvisioningRun {
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn tracker(&self) -> &Arc<ProgressTracker> {
        &self.tracker
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.tracker.snapshot()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every task is `Done`.
    Completed,
    /// A task failed; tasks after it were not attempted.
    Halted { task: TaskKey, error: String },
}

/// Result of `run` / `resume`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub tenant_id: TenantId,
    pub outcome: RunOutcome,
    /// Records created during this invocation.
    pub created: usize,
    /// Records found already present during this invocation.
    pub skipped: usize,
    pub snapshot: ProgressSnapshot,
}

impl RunResult {
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }

    pub fn halted_at(&self) -> Option<&TaskKey> {
        match &self.outcome {
            RunOutcome::Halted { task, .. } => Some(task),
            RunOutcome::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("unknown task: {0}")]
    UnknownTask(TaskKey),
    #[error("task `{key}` is {status}; only failed tasks can be retried")]
    NotRetryable { key: TaskKey, status: TaskStatus },
    #[error(transparent)]
    Seeding(#[from] SeedingFailure),
}

/// What a successful [`retry`](ProvisioningOrchestrator::retry) did.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutcome {
    /// Tally of the retried task.
    pub seeded: SeedOutcome,
    /// Continuation over the remaining pending tasks, when `advance_after_retry` is on.
    pub resumed: Option<RunResult>,
}

impl RetryOutcome {
    /// Task the continuation halted at, if it ran and stopped early.
    pub fn halted_at(&self) -> Option<&TaskKey> {
        self.resumed.as_ref().and_then(RunResult::halted_at)
    }
}

/// Result of a single-task retry.
pub type TaskResult = Result<RetryOutcome, ProvisioningError>;

/// Forwards seeder callbacks into the run's tracker.
struct TrackerSink<'a> {
    tracker: &'a ProgressTracker,
    key: &'a TaskKey,
}

impl ProgressSink for TrackerSink<'_> {
    fn on_progress(&self, completed: usize, current_item: &str, skipped: usize) {
        record(
            self.tracker,
            self.key,
            ProgressUpdate::new()
                .counts(completed, skipped)
                .current_item(Some(current_item.to_string())),
        );
    }
}

fn record(tracker: &ProgressTracker, key: &TaskKey, update: ProgressUpdate) {
    if let Err(e) = tracker.update(key, update) {
        warn!(task = %key, error = %e, "progress update dropped");
    }
}

pub struct ProvisioningOrchestrator {
    registry: TaskRegistry,
    options: OrchestratorOptions,
}

impl ProvisioningOrchestrator {
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            registry,
            options: OrchestratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn options(&self) -> OrchestratorOptions {
        self.options
    }

    /// Create the run aggregate for `tenant_id` with every task `Pending`.
    pub fn new_run(&self, tenant_id: TenantId) -> ProvisioningRun {
        ProvisioningRun {
            tenant_id,
            tracker: Arc::new(ProgressTracker::new(self.registry.definitions())),
        }
    }

    /// Create a run for the tenant whose profile the wizard just saved.
    pub fn begin(&self, profile: &dyn TenantProfileUpdater) -> ProvisioningRun {
        self.new_run(profile.tenant_id())
    }

    /// Reset progress and seed every task in order, halting on the first failure.
    pub fn run(&self, run: &ProvisioningRun) -> RunResult {
        info!(
            tenant_id = %run.tenant_id,
            tasks = self.registry.len(),
            "provisioning run started"
        );
        run.tracker.reset();
        self.advance(run)
    }

    /// Re-seed one failed task, leaving every other task untouched.
    ///
    /// Records the earlier attempt created are found and skipped, so only the
    /// still-missing ones are created. With `advance_after_retry` enabled a
    /// successful retry is followed by [`resume`](Self::resume) and its result
    /// is returned in [`RetryOutcome::resumed`].
    pub fn retry(&self, run: &ProvisioningRun, key: &TaskKey) -> TaskResult {
        let entry = self
            .registry
            .get(key)
            .ok_or_else(|| ProvisioningError::UnknownTask(key.clone()))?;

        let status = run
            .tracker
            .get(key)
            .map(|p| p.status)
            .ok_or_else(|| ProvisioningError::UnknownTask(key.clone()))?;
        if !status.is_retriable() {
            warn!(tenant_id = %run.tenant_id, task = %key, %status, "retry refused");
            return Err(ProvisioningError::NotRetryable {
                key: key.clone(),
                status,
            });
        }

        info!(tenant_id = %run.tenant_id, task = %key, "retrying task");
        let seeded = self.seed_task(run, entry)?;

        let resumed = self.options.advance_after_retry.then(|| self.resume(run));
        if let Some(resumed) = &resumed {
            debug!(
                tenant_id = %run.tenant_id,
                complete = resumed.is_complete(),
                "advanced after retry"
            );
        }

        Ok(RetryOutcome { seeded, resumed })
    }

    /// Seed the tasks still `Pending`, in order, without resetting progress.
    ///
    /// Refuses to move past a task in `Error`: that task must be retried first.
    pub fn resume(&self, run: &ProvisioningRun) -> RunResult {
        let snapshot = run.tracker.snapshot();
        if let Some(failed) = snapshot.failed_task() {
            let error = failed.progress.error.clone().unwrap_or_default();
            warn!(
                tenant_id = %run.tenant_id,
                task = %failed.key,
                "resume blocked by failed task"
            );
            return RunResult {
                tenant_id: run.tenant_id,
                outcome: RunOutcome::Halted {
                    task: failed.key.clone(),
                    error,
                },
                created: 0,
                skipped: 0,
                snapshot,
            };
        }

        info!(tenant_id = %run.tenant_id, "resuming provisioning run");
        self.advance(run)
    }

    /// Seed every `Pending` task in registry order until one fails.
    fn advance(&self, run: &ProvisioningRun) -> RunResult {
        let mut created = 0;
        let mut skipped = 0;

        for entry in self.registry.entries() {
            let pending = run
                .tracker
                .get(entry.key())
                .is_some_and(|p| p.status == TaskStatus::Pending);
            if !pending {
                continue;
            }

            match self.seed_task(run, entry) {
                Ok(outcome) => {
                    created += outcome.created;
                    skipped += outcome.skipped;
                }
                Err(failure) => {
                    warn!(
                        tenant_id = %run.tenant_id,
                        task = %entry.key(),
                        "provisioning run halted"
                    );
                    return RunResult {
                        tenant_id: run.tenant_id,
                        outcome: RunOutcome::Halted {
                            task: entry.key().clone(),
                            error: failure.to_string(),
                        },
                        created,
                        skipped,
                        snapshot: run.tracker.snapshot(),
                    };
                }
            }
        }

        info!(
            tenant_id = %run.tenant_id,
            created,
            skipped,
            "provisioning run completed"
        );
        RunResult {
            tenant_id: run.tenant_id,
            outcome: RunOutcome::Completed,
            created,
            skipped,
            snapshot: run.tracker.snapshot(),
        }
    }

    /// `Seeding` → `Done` | `Error` for one task.
    fn seed_task(
        &self,
        run: &ProvisioningRun,
        entry: &TaskEntry,
    ) -> Result<SeedOutcome, SeedingFailure> {
        let key = entry.key();
        let tracker = run.tracker.as_ref();

        record(
            tracker,
            key,
            ProgressUpdate::new()
                .status(TaskStatus::Seeding)
                .counts(0, 0)
                .current_item(None)
                .error(None),
        );
        debug!(tenant_id = %run.tenant_id, task = %key, "task seeding");

        let sink = TrackerSink { tracker, key };
        match entry.seeder().seed(run.tenant_id, &sink) {
            Ok(outcome) => {
                record(
                    tracker,
                    key,
                    ProgressUpdate::new()
                        .status(TaskStatus::Done)
                        .total(outcome.total_target)
                        .counts(outcome.total_target, outcome.skipped)
                        .current_item(None),
                );
                info!(
                    tenant_id = %run.tenant_id,
                    task = %key,
                    created = outcome.created,
                    skipped = outcome.skipped,
                    "task done"
                );
                Ok(outcome)
            }
            Err(failure) => {
                record(
                    tracker,
                    key,
                    ProgressUpdate::new()
                        .status(TaskStatus::Error)
                        .current_item(None)
                        .error(Some(failure.to_string())),
                );
                warn!(
                    tenant_id = %run.tenant_id,
                    task = %key,
                    error = %failure,
                    "task failed"
                );
                Err(failure)
            }
        }
    }
}
