//! Marks a tenant as configured once provisioning has succeeded.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use coldstore_core::TenantId;

use crate::backend::BackendError;
use crate::orchestrator::ProvisioningRun;
use crate::task::{TaskKey, TaskStatus};
use crate::tenant::{Tenant, TenantRepository};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("tenant not found: {0}")]
    TenantNotFound(TenantId),
    /// `failed` is the first task in `Error`; `pending` lists the tasks
    /// never attempted or still seeding.
    #[error("provisioning incomplete (failed: {failed:?}, pending: {pending:?})")]
    Incomplete {
        failed: Option<TaskKey>,
        pending: Vec<TaskKey>,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Writes the tenant's `configured` flag.
///
/// [`finalize`](Self::finalize) trusts its caller to have seen every task
/// `Done`. [`finalize_if_complete`](Self::finalize_if_complete) checks that
/// first and is what callers normally use.
pub struct ConfigurationFinalizer<R> {
    tenants: R,
}

impl<R> ConfigurationFinalizer<R>
where
    R: TenantRepository,
{
    pub fn new(tenants: R) -> Self {
        Self { tenants }
    }

    /// Set `configured = true`. Calling it again is a no-op rewrite.
    pub fn finalize(&self, tenant_id: TenantId) -> Result<Tenant, FinalizeError> {
        let mut tenant = self
            .tenants
            .get(tenant_id)?
            .ok_or(FinalizeError::TenantNotFound(tenant_id))?;

        let already = tenant.configured;
        tenant.mark_configured(Utc::now());
        self.tenants.save(tenant.clone())?;

        info!(%tenant_id, already_configured = already, "tenant marked configured");
        Ok(tenant)
    }

    /// Finalize only if every task of `run` is `Done`.
    pub fn finalize_if_complete(&self, run: &ProvisioningRun) -> Result<Tenant, FinalizeError> {
        let snapshot = run.snapshot();
        if !snapshot.all_done() {
            let failed = snapshot.failed_task().map(|t| t.key.clone());
            let pending = snapshot
                .tasks
                .iter()
                .filter(|t| {
                    matches!(t.progress.status, TaskStatus::Pending | TaskStatus::Seeding)
                })
                .map(|t| t.key.clone())
                .collect();
            warn!(
                tenant_id = %run.tenant_id(),
                ?failed,
                "finalize refused, provisioning incomplete"
            );
            return Err(FinalizeError::Incomplete { failed, pending });
        }
        self.finalize(run.tenant_id())
    }
}
