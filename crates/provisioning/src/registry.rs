//! Ordered registry mapping task keys to seeders.
//!
//! Registration order is the execution order. The registry is built once at
//! startup and read-only afterwards.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::CollectionBackend;
use crate::catalog::{
    self, Bank, Commodity, LaborRate, LedgerAccount, RolePermissions, SystemConfiguration,
    TaxRate,
};
use crate::seeder::{CatalogSeeder, TaskSeeder};
use crate::task::{TaskDefinition, TaskKey};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("task `{0}` is already registered")]
    DuplicateKey(TaskKey),
}

/// One registered task: its static definition and the seeder that runs it.
pub struct TaskEntry {
    definition: TaskDefinition,
    seeder: Box<dyn TaskSeeder>,
}

impl TaskEntry {
    pub fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    pub fn key(&self) -> &TaskKey {
        &self.definition.key
    }

    pub fn seeder(&self) -> &dyn TaskSeeder {
        self.seeder.as_ref()
    }
}

impl core::fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskEntry")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Backend handles for every standard master-data collection.
#[derive(Clone)]
pub struct MasterDataBackends {
    pub configuration: Arc<dyn CollectionBackend<SystemConfiguration>>,
    pub permissions: Arc<dyn CollectionBackend<RolePermissions>>,
    pub taxes: Arc<dyn CollectionBackend<TaxRate>>,
    pub labor: Arc<dyn CollectionBackend<LaborRate>>,
    pub accounts: Arc<dyn CollectionBackend<LedgerAccount>>,
    pub banks: Arc<dyn CollectionBackend<Bank>>,
    pub commodities: Arc<dyn CollectionBackend<Commodity>>,
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    entries: Vec<TaskEntry>,
}

impl TaskRegistry {
    pub fn builder() -> TaskRegistryBuilder {
        TaskRegistryBuilder::default()
    }

    /// The seven standard collections in their fixed order.
    ///
    /// System configuration comes first since everything else is tenant-scoped
    /// under it.
    pub fn standard(backends: MasterDataBackends) -> Self {
        let mut builder = TaskRegistryBuilder::default();
        builder.push(
            "System configuration",
            CatalogSeeder::new(
                catalog::CONFIGURATION,
                backends.configuration,
                catalog::system_configuration,
            ),
        );
        builder.push(
            "Role permissions",
            CatalogSeeder::new(
                catalog::PERMISSIONS,
                backends.permissions,
                catalog::role_permissions,
            ),
        );
        builder.push(
            "Tax rates",
            CatalogSeeder::new(catalog::TAXES, backends.taxes, catalog::tax_rates),
        );
        builder.push(
            "Labour rates",
            CatalogSeeder::new(catalog::LABOR, backends.labor, catalog::labor_rates),
        );
        builder.push(
            "Chart of accounts",
            CatalogSeeder::new(catalog::ACCOUNTS, backends.accounts, catalog::chart_of_accounts),
        );
        builder.push(
            "Banks",
            CatalogSeeder::new(catalog::BANKS, backends.banks, catalog::bank_list),
        );
        builder.push(
            "Commodities",
            CatalogSeeder::new(
                catalog::COMMODITIES,
                backends.commodities,
                catalog::commodity_list,
            ),
        );
        builder.build()
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    pub fn get(&self, key: &TaskKey) -> Option<&TaskEntry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    pub fn definitions(&self) -> Vec<TaskDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TaskRegistryBuilder {
    entries: Vec<TaskEntry>,
}

impl TaskRegistryBuilder {
    /// Append a task; its position is the number of tasks registered before it.
    pub fn register(
        mut self,
        label: impl Into<String>,
        seeder: impl TaskSeeder + 'static,
    ) -> Result<Self, RegistryError> {
        if self.entries.iter().any(|e| e.key() == seeder.key()) {
            return Err(RegistryError::DuplicateKey(seeder.key().clone()));
        }
        self.push(label, seeder);
        Ok(self)
    }

    pub fn build(self) -> TaskRegistry {
        TaskRegistry {
            entries: self.entries,
        }
    }

    fn push(&mut self, label: impl Into<String>, seeder: impl TaskSeeder + 'static) {
        let definition = TaskDefinition {
            key: seeder.key().clone(),
            label: label.into(),
            expected_record_count: seeder.expected_records(),
            position: self.entries.len(),
        };
        self.entries.push(TaskEntry {
            definition,
            seeder: Box::new(seeder),
        });
    }
}
