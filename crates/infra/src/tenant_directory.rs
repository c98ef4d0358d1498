//! Tenant storage and the profile step that precedes provisioning.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use tracing::{info, warn};

use coldstore_core::{DomainError, TenantId};
use coldstore_provisioning::{
    BackendError, Tenant, TenantProfile, TenantProfileUpdater, TenantRepository,
};

/// In-memory tenant directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    inner: RwLock<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TenantRepository for InMemoryTenantDirectory {
    fn get(&self, tenant_id: TenantId) -> Result<Option<Tenant>, BackendError> {
        let map = self
            .inner
            .read()
            .map_err(|_| BackendError::unavailable("tenant directory lock poisoned"))?;
        Ok(map.get(&tenant_id).cloned())
    }

    fn save(&self, tenant: Tenant) -> Result<(), BackendError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| BackendError::unavailable("tenant directory lock poisoned"))?;
        map.insert(tenant.id, tenant);
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Persists wizard profile fields for one tenant through a [`TenantRepository`].
///
/// Provisioning runs after [`save`](Self::save) succeeds and only reads the
/// tenant identifier back through [`TenantProfileUpdater`].
pub struct RepositoryProfileUpdater<R> {
    tenants: R,
    tenant_id: TenantId,
}

impl<R> RepositoryProfileUpdater<R>
where
    R: TenantRepository,
{
    pub fn new(tenants: R, tenant_id: TenantId) -> Self {
        Self { tenants, tenant_id }
    }

    /// Validate and store `profile`, creating the tenant on first save.
    ///
    /// The `configured` flag is left as it is.
    pub fn save(&self, profile: TenantProfile) -> Result<Tenant, ProfileError> {
        if let Err(e) = profile.validate() {
            warn!(tenant_id = %self.tenant_id, error = %e, "tenant profile rejected");
            return Err(e.into());
        }

        let tenant = match self.tenants.get(self.tenant_id)? {
            Some(mut existing) => {
                existing.profile = profile;
                existing
            }
            None => Tenant::new(self.tenant_id, profile),
        };
        self.tenants.save(tenant.clone())?;
        info!(tenant_id = %self.tenant_id, name = %tenant.profile.name, "tenant profile saved");
        Ok(tenant)
    }
}

impl<R> TenantProfileUpdater for RepositoryProfileUpdater<R>
where
    R: TenantRepository,
{
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
