use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use coldstore_core::TenantId;
use coldstore_provisioning::catalog::{
    Bank, Commodity, LaborRate, LedgerAccount, RolePermissions, SystemConfiguration, TaxRate,
};
use coldstore_provisioning::{BackendError, CollectionBackend, MasterDataBackends, MasterRecord};

/// In-memory, tenant-isolated collection for tests/dev.
///
/// Rows keep insertion order per tenant. Creating a natural key that is
/// already present answers `AlreadyExists` instead of duplicating.
#[derive(Debug)]
pub struct InMemoryCollection<R> {
    inner: RwLock<HashMap<TenantId, Vec<R>>>,
}

impl<R> InMemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<R> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MasterRecord> InMemoryCollection<R> {
    /// Number of rows stored for `tenant_id`.
    pub fn count(&self, tenant_id: TenantId) -> usize {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return 0,
        };
        map.get(&tenant_id).map_or(0, Vec::len)
    }

    /// Clear all rows for a tenant.
    pub fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(&tenant_id);
        }
    }
}

impl<R: MasterRecord> CollectionBackend<R> for InMemoryCollection<R> {
    fn list(&self, tenant_id: TenantId) -> Result<Vec<R>, BackendError> {
        let map = self
            .inner
            .read()
            .map_err(|_| BackendError::unavailable("collection lock poisoned"))?;
        Ok(map.get(&tenant_id).cloned().unwrap_or_default())
    }

    fn create(&self, tenant_id: TenantId, record: R) -> Result<R, BackendError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| BackendError::unavailable("collection lock poisoned"))?;
        let rows = map.entry(tenant_id).or_default();

        let key = record.natural_key();
        if rows.iter().any(|r| r.natural_key() == key) {
            return Err(BackendError::AlreadyExists(key));
        }
        rows.push(record.clone());
        Ok(record)
    }
}

/// One in-memory collection per standard master-data task.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMasterData {
    pub configuration: Arc<InMemoryCollection<SystemConfiguration>>,
    pub permissions: Arc<InMemoryCollection<RolePermissions>>,
    pub taxes: Arc<InMemoryCollection<TaxRate>>,
    pub labor: Arc<InMemoryCollection<LaborRate>>,
    pub accounts: Arc<InMemoryCollection<LedgerAccount>>,
    pub banks: Arc<InMemoryCollection<Bank>>,
    pub commodities: Arc<InMemoryCollection<Commodity>>,
}

impl InMemoryMasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend handles for [`TaskRegistry::standard`].
    ///
    /// [`TaskRegistry::standard`]: coldstore_provisioning::TaskRegistry::standard
    pub fn backends(&self) -> MasterDataBackends {
        MasterDataBackends {
            configuration: self.configuration.clone(),
            permissions: self.permissions.clone(),
            taxes: self.taxes.clone(),
            labor: self.labor.clone(),
            accounts: self.accounts.clone(),
            banks: self.banks.clone(),
            commodities: self.commodities.clone(),
        }
    }

    /// Total rows across all collections for `tenant_id`.
    pub fn record_count(&self, tenant_id: TenantId) -> usize {
        self.configuration.count(tenant_id)
            + self.permissions.count(tenant_id)
            + self.taxes.count(tenant_id)
            + self.labor.count(tenant_id)
            + self.accounts.count(tenant_id)
            + self.banks.count(tenant_id)
            + self.commodities.count(tenant_id)
    }
}
