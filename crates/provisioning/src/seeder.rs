//! Task seeders: make one master-data collection contain its fixed records.
//!
//! Every seeder follows the same algorithm:
//!
//! ```text
//! list existing (tenant-scoped)
//!   ↓
//! partition the static target set into present / missing (by natural key)
//!   ↓
//! create each missing record sequentially, reporting progress after each one
//!   ↓
//! return { created, skipped, total_target }
//! ```
//!
//! Seeders never update or delete. Re-running converges instead of duplicating,
//! which is what makes a failed task safe to retry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use coldstore_core::TenantId;

use crate::backend::{BackendError, CollectionBackend, MasterRecord};
use crate::task::TaskKey;

/// Observer for fine-grained seeding progress.
///
/// Called with `(completed_so_far, current_item, skipped_so_far)`; `completed`
/// includes records that were already present.
pub trait ProgressSink {
    fn on_progress(&self, completed: usize, current_item: &str, skipped: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, &str, usize),
{
    fn on_progress(&self, completed: usize, current_item: &str, skipped: usize) {
        self(completed, current_item, skipped)
    }
}

/// Sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _completed: usize, _current_item: &str, _skipped: usize) {}
}

/// Tally returned by a successful seeding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedOutcome {
    pub created: usize,
    pub skipped: usize,
    pub total_target: usize,
}

/// Why a seeding pass stopped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeedCause {
    /// Listing existing records failed; nothing was written.
    #[error("could not list existing records: {0}")]
    Fetch(#[source] BackendError),
    /// Creating one record failed; earlier records of the pass remain.
    #[error("could not create `{item}`: {source}")]
    Create {
        item: String,
        #[source]
        source: BackendError,
    },
}

/// Typed failure surfaced by a seeder to the orchestrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("seeding `{task_key}` failed: {cause}")]
pub struct SeedingFailure {
    pub task_key: TaskKey,
    #[source]
    pub cause: SeedCause,
}

impl SeedingFailure {
    pub fn fetch(task_key: TaskKey, source: BackendError) -> Self {
        Self {
            task_key,
            cause: SeedCause::Fetch(source),
        }
    }

    pub fn create(task_key: TaskKey, item: impl Into<String>, source: BackendError) -> Self {
        Self {
            task_key,
            cause: SeedCause::Create {
                item: item.into(),
                source,
            },
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self.cause, SeedCause::Fetch(_))
    }
}

/// One seeding routine per master-data collection.
pub trait TaskSeeder: Send + Sync {
    /// Registry key of the collection this seeder owns.
    fn key(&self) -> &TaskKey;

    /// Size of the static target set.
    fn expected_records(&self) -> usize;

    /// Ensure every target record exists for `tenant_id`.
    fn seed(
        &self,
        tenant_id: TenantId,
        progress: &dyn ProgressSink,
    ) -> Result<SeedOutcome, SeedingFailure>;
}

/// Seeder backed by a static catalog and a [`CollectionBackend`].
pub struct CatalogSeeder<R, B> {
    key: TaskKey,
    backend: B,
    catalog: fn() -> Vec<R>,
}

impl<R, B> CatalogSeeder<R, B>
where
    R: MasterRecord,
    B: CollectionBackend<R>,
{
    pub fn new(key: impl Into<TaskKey>, backend: B, catalog: fn() -> Vec<R>) -> Self {
        Self {
            key: key.into(),
            backend,
            catalog,
        }
    }

    /// The fixed records this collection should contain.
    pub fn target(&self) -> Vec<R> {
        (self.catalog)()
    }
}

impl<R, B> TaskSeeder for CatalogSeeder<R, B>
where
    R: MasterRecord,
    B: CollectionBackend<R>,
{
    fn key(&self) -> &TaskKey {
        &self.key
    }

    fn expected_records(&self) -> usize {
        self.target().len()
    }

    fn seed(
        &self,
        tenant_id: TenantId,
        progress: &dyn ProgressSink,
    ) -> Result<SeedOutcome, SeedingFailure> {
        let existing = self.backend.list(tenant_id).map_err(|e| {
            warn!(task = %self.key, %tenant_id, error = %e, "listing existing records failed");
            SeedingFailure::fetch(self.key.clone(), e)
        })?;

        let present: HashSet<String> = existing.iter().map(MasterRecord::natural_key).collect();
        let target = self.target();
        let total_target = target.len();

        let (already, missing): (Vec<R>, Vec<R>) = target
            .into_iter()
            .partition(|r| present.contains(&r.natural_key()));

        let mut skipped = already.len();
        let mut completed = skipped;
        let mut created = 0;

        debug!(
            task = %self.key,
            %tenant_id,
            present = skipped,
            missing = missing.len(),
            "partitioned target set"
        );

        if let Some(last) = already.last() {
            progress.on_progress(completed, &last.label(), skipped);
        }

        for record in missing {
            let label = record.label();
            match self.backend.create(tenant_id, record) {
                Ok(_) => {
                    created += 1;
                    debug!(task = %self.key, item = %label, "record created");
                }
                // Raced with another writer; the record is there, which is all we need.
                Err(BackendError::AlreadyExists(_)) => {
                    skipped += 1;
                    debug!(task = %self.key, item = %label, "record already exists, skipping");
                }
                Err(e) => {
                    warn!(task = %self.key, item = %label, error = %e, "record creation failed");
                    return Err(SeedingFailure::create(self.key.clone(), label, e));
                }
            }
            completed += 1;
            progress.on_progress(completed, &label, skipped);
        }

        Ok(SeedOutcome {
            created,
            skipped,
            total_target,
        })
    }
}
