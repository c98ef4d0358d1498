//! `coldstore-provisioning`: tenant provisioning orchestration.
//!
//! Seeds the fixed master-data collections (system configuration, role
//! permissions, tax and labour rates, chart of accounts, banks, commodities)
//! into a newly created tenant.
//!
//! ## Components
//!
//! - [`TaskSeeder`]: idempotent seeding of one collection
//! - [`TaskRegistry`]: fixed, ordered mapping of task keys to seeders
//! - [`ProgressTracker`]: per-task counts and status, read via snapshots
//! - [`ProvisioningOrchestrator`]: sequential run, halt on failure, single-task retry
//! - [`ConfigurationFinalizer`]: marks the tenant configured after success
//!
//! Pure orchestration: persistence is reached through [`CollectionBackend`]
//! and [`TenantRepository`], implemented by infra.

pub mod backend;
pub mod catalog;
pub mod finalizer;
pub mod orchestrator;
pub mod progress;
pub mod registry;
pub mod seeder;
pub mod task;
pub mod tenant;

pub use backend::{BackendError, CollectionBackend, MasterRecord};
pub use finalizer::{ConfigurationFinalizer, FinalizeError};
pub use orchestrator::{
    OrchestratorOptions, ProvisioningError, ProvisioningOrchestrator, ProvisioningRun,
    RetryOutcome, RunOutcome, RunResult, TaskResult,
};
pub use progress::{
    ProgressEvent, ProgressSnapshot, ProgressSubscription, ProgressTracker, ProgressUpdate,
    SUBSCRIPTION_BUFFER, TaskProgress, TaskSnapshot, TrackerError,
};
pub use registry::{MasterDataBackends, RegistryError, TaskEntry, TaskRegistry, TaskRegistryBuilder};
pub use seeder::{
    CatalogSeeder, NoProgress, ProgressSink, SeedCause, SeedOutcome, SeedingFailure, TaskSeeder,
};
pub use task::{TaskDefinition, TaskKey, TaskStatus};
pub use tenant::{Tenant, TenantProfile, TenantProfileUpdater, TenantRepository};
