//! Tenant boundary: the organization being provisioned.
//!
//! The surrounding application owns tenants. Provisioning only reads the
//! identifier and writes the `configured` flag.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coldstore_core::{DomainError, DomainResult, TenantId};

use crate::backend::BackendError;

/// Editable profile fields collected by the setup wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    pub name: String,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc: Option<String>,
    pub packet_weight_kg: Option<u32>,
}

impl TenantProfile {
    /// Minimal checks before the profile is stored.
    ///
    /// Format checks on GSTIN/PAN/IFSC belong to the wizard form.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        if self.packet_weight_kg == Some(0) {
            return Err(DomainError::validation(
                "packet_weight_kg",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub profile: TenantProfile,
    pub configured: bool,
    pub configured_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn new(id: TenantId, profile: TenantProfile) -> Self {
        Self {
            id,
            profile,
            configured: false,
            configured_at: None,
        }
    }

    /// Flag the tenant as configured, keeping the first timestamp.
    pub fn mark_configured(&mut self, at: DateTime<Utc>) {
        self.configured = true;
        self.configured_at.get_or_insert(at);
    }
}

/// Persistence for tenants.
pub trait TenantRepository: Send + Sync {
    fn get(&self, tenant_id: TenantId) -> Result<Option<Tenant>, BackendError>;
    fn save(&self, tenant: Tenant) -> Result<(), BackendError>;
}

impl<R> TenantRepository for Arc<R>
where
    R: TenantRepository + ?Sized,
{
    fn get(&self, tenant_id: TenantId) -> Result<Option<Tenant>, BackendError> {
        (**self).get(tenant_id)
    }

    fn save(&self, tenant: Tenant) -> Result<(), BackendError> {
        (**self).save(tenant)
    }
}

/// The wizard step that persists profile fields before provisioning runs.
///
/// Provisioning only needs the finalized tenant identifier from it.
pub trait TenantProfileUpdater {
    fn tenant_id(&self) -> TenantId;
}
