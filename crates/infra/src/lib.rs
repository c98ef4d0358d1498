//! Infrastructure layer: master-data backends, tenant storage, configuration.

pub mod config;
pub mod master_data;
pub mod tenant_directory;

mod integration_tests;

pub use config::{ConfigError, ProvisioningConfig};
pub use master_data::{InMemoryCollection, InMemoryMasterData};
pub use tenant_directory::{InMemoryTenantDirectory, ProfileError, RepositoryProfileUpdater};
