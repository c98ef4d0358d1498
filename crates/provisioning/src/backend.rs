//! Backend data-access boundary for master-data collections.
//!
//! The orchestrator never talks to persistence directly; every collection is
//! reached through a [`CollectionBackend`] which may be remote and may fail.

use std::sync::Arc;

use coldstore_core::TenantId;
use thiserror::Error;

/// A master-data record that can be matched by natural key.
pub trait MasterRecord: Clone + Send + Sync + core::fmt::Debug + 'static {
    /// Stable identity within a tenant's collection (role name, bank code, ...).
    fn natural_key(&self) -> String;

    /// Human-readable label shown while the record is in flight.
    fn label(&self) -> String {
        self.natural_key()
    }
}

/// Failure reported by a backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// The call did not complete in time.
    #[error("backend call timed out: {0}")]
    Timeout(String),
    /// The backend refused the request.
    #[error("backend rejected request: {0}")]
    Rejected(String),
    /// A record with the same natural key already exists for the tenant.
    #[error("record already exists: {0}")]
    AlreadyExists(String),
}

impl BackendError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Tenant-scoped list/create access to one master-data collection.
///
/// `create` must not duplicate a natural key that is already present for the
/// tenant: implementations answer [`BackendError::AlreadyExists`] instead.
/// Seeders rely on this to stay safe under concurrent runs.
pub trait CollectionBackend<R>: Send + Sync {
    fn list(&self, tenant_id: TenantId) -> Result<Vec<R>, BackendError>;
    fn create(&self, tenant_id: TenantId, record: R) -> Result<R, BackendError>;
}

impl<R, B> CollectionBackend<R> for Arc<B>
where
    B: CollectionBackend<R> + ?Sized,
{
    fn list(&self, tenant_id: TenantId) -> Result<Vec<R>, BackendError> {
        (**self).list(tenant_id)
    }

    fn create(&self, tenant_id: TenantId, record: R) -> Result<R, BackendError> {
        (**self).create(tenant_id, record)
    }
}
