//! End-to-end provisioning against the in-memory backends.
//!
//! Profile save → run → (fail → retry → resume) → finalize, plus re-runs over
//! an already provisioned tenant.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use coldstore_core::TenantId;
    use coldstore_provisioning::catalog::{self, Bank, Commodity, LedgerAccount};
    use coldstore_provisioning::{
        BackendError, CollectionBackend, ConfigurationFinalizer, FinalizeError, MasterRecord,
        ProvisioningOrchestrator, RunOutcome, TaskRegistry, TaskStatus, TenantProfile,
        TenantRepository,
    };

    use crate::config::ProvisioningConfig;
    use crate::master_data::{InMemoryCollection, InMemoryMasterData};
    use crate::tenant_directory::{InMemoryTenantDirectory, RepositoryProfileUpdater};

    const ALL_RECORDS: usize = 111;

    /// Backend that counts creates and fails on demand.
    struct Flaky<R> {
        inner: Arc<InMemoryCollection<R>>,
        fail_list: AtomicBool,
        fail_on_create: Mutex<Option<usize>>,
        creates: AtomicUsize,
    }

    impl<R> Flaky<R> {
        fn wrapping(inner: Arc<InMemoryCollection<R>>) -> Self {
            Self {
                inner,
                fail_list: AtomicBool::new(false),
                fail_on_create: Mutex::new(None),
                creates: AtomicUsize::new(0),
            }
        }

        /// Fail the `n`th create call from now on (1-based), once.
        fn fail_create_at(&self, n: usize) {
            let base = self.creates.load(Ordering::SeqCst);
            *self.fail_on_create.lock().unwrap() = Some(base + n);
        }

        fn creates(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
        }
    }

    impl<R: MasterRecord> CollectionBackend<R> for Flaky<R> {
        fn list(&self, tenant_id: TenantId) -> Result<Vec<R>, BackendError> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(BackendError::unavailable("ledger offline"));
            }
            self.inner.list(tenant_id)
        }

        fn create(&self, tenant_id: TenantId, record: R) -> Result<R, BackendError> {
            let call = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
            let mut fail_on = self.fail_on_create.lock().unwrap();
            if *fail_on == Some(call) {
                *fail_on = None;
                return Err(BackendError::Timeout(format!("create {}", record.natural_key())));
            }
            drop(fail_on);
            self.inner.create(tenant_id, record)
        }
    }

    struct Harness {
        data: InMemoryMasterData,
        ledger: Arc<Flaky<LedgerAccount>>,
        banks: Arc<Flaky<Bank>>,
        commodities: Arc<Flaky<Commodity>>,
        tenants: Arc<InMemoryTenantDirectory>,
        orchestrator: ProvisioningOrchestrator,
        finalizer: ConfigurationFinalizer<Arc<InMemoryTenantDirectory>>,
    }

    impl Harness {
        fn new(config: &ProvisioningConfig) -> Self {
            let data = InMemoryMasterData::new();
            let ledger = Arc::new(Flaky::wrapping(data.accounts.clone()));
            let banks = Arc::new(Flaky::wrapping(data.banks.clone()));
            let commodities = Arc::new(Flaky::wrapping(data.commodities.clone()));
            let mut backends = data.backends();
            backends.accounts = ledger.clone();
            backends.banks = banks.clone();
            backends.commodities = commodities.clone();

            let tenants = Arc::new(InMemoryTenantDirectory::new());
            let orchestrator = ProvisioningOrchestrator::new(TaskRegistry::standard(backends))
                .with_options(config.orchestrator_options());
            let finalizer = ConfigurationFinalizer::new(tenants.clone());

            Self {
                data,
                ledger,
                banks,
                commodities,
                tenants,
                orchestrator,
                finalizer,
            }
        }

        fn register_tenant(&self) -> RepositoryProfileUpdater<Arc<InMemoryTenantDirectory>> {
            let updater = RepositoryProfileUpdater::new(self.tenants.clone(), TenantId::new());
            updater
                .save(TenantProfile {
                    name: "Ganga Cold Storage".to_string(),
                    ifsc: Some("SBIN0001234".to_string()),
                    packet_weight_kg: Some(50),
                    ..Default::default()
                })
                .unwrap();
            updater
        }
    }

    #[test]
    fn fresh_tenant_is_fully_seeded_and_finalized() {
        let h = Harness::new(&ProvisioningConfig::default());
        let profile = h.register_tenant();

        let run = h.orchestrator.begin(&profile);
        let events = run.tracker().subscribe();
        let result = h.orchestrator.run(&run);

        assert!(result.is_complete());
        assert_eq!(result.created, ALL_RECORDS);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.snapshot.total_completed_records, ALL_RECORDS);
        assert_eq!(result.snapshot.total_target_records, ALL_RECORDS);
        assert_eq!(result.snapshot.percent_complete, 1.0);
        assert_eq!(h.data.record_count(run.tenant_id()), ALL_RECORDS);

        let done: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|e| e.progress.status == TaskStatus::Done)
            .map(|e| e.key)
            .collect();
        assert_eq!(done.len(), 7);
        assert_eq!(done[0], catalog::CONFIGURATION);
        assert_eq!(done[6], catalog::COMMODITIES);

        let tenant = h.finalizer.finalize_if_complete(&run).unwrap();
        assert!(tenant.configured);
        assert!(h.tenants.get(run.tenant_id()).unwrap().unwrap().configured);
    }

    #[test]
    fn rerun_skips_everything_and_creates_nothing() {
        let h = Harness::new(&ProvisioningConfig::default());
        let profile = h.register_tenant();
        let run = h.orchestrator.begin(&profile);
        h.orchestrator.run(&run);

        let again = h.orchestrator.run(&run);

        assert!(again.is_complete());
        assert_eq!(again.created, 0);
        assert_eq!(again.skipped, ALL_RECORDS);
        assert_eq!(h.data.record_count(run.tenant_id()), ALL_RECORDS);
        let accounts = again.snapshot.task("accounts").unwrap();
        assert_eq!(accounts.progress.completed, 56);
        assert_eq!(accounts.progress.skipped, 56);
    }

    #[test]
    fn tenants_are_isolated() {
        let h = Harness::new(&ProvisioningConfig::default());
        let first = h.orchestrator.begin(&h.register_tenant());
        let second = h.orchestrator.begin(&h.register_tenant());

        h.orchestrator.run(&first);

        assert_eq!(h.data.record_count(first.tenant_id()), ALL_RECORDS);
        assert_eq!(h.data.record_count(second.tenant_id()), 0);

        let result = h.orchestrator.run(&second);
        assert_eq!(result.created, ALL_RECORDS);
    }

    #[test]
    fn failure_mid_task_halts_then_retry_and_resume_complete_the_run() {
        let h = Harness::new(&ProvisioningConfig::default());
        let profile = h.register_tenant();
        let run = h.orchestrator.begin(&profile);
        h.ledger.fail_create_at(4);

        let halted = h.orchestrator.run(&run);

        assert!(!halted.is_complete());
        assert_eq!(halted.halted_at(), Some(&catalog::ACCOUNTS));
        assert_eq!(halted.created, 15);
        let snapshot = &halted.snapshot;
        assert!(snapshot.has_error);
        for key in ["configuration", "permissions", "taxes", "labor"] {
            let task = snapshot.task(key).unwrap();
            assert_eq!(task.progress.status, TaskStatus::Done, "{key}");
            assert_eq!(task.progress.completed, task.progress.total, "{key}");
        }
        let accounts = snapshot.task("accounts").unwrap();
        assert_eq!(accounts.progress.status, TaskStatus::Error);
        assert_eq!(accounts.progress.completed, 3);
        assert!(accounts.progress.error.as_deref().unwrap().contains("accounts"));
        assert_eq!(
            snapshot.keys_with_status(TaskStatus::Pending),
            vec![catalog::BANKS, catalog::COMMODITIES]
        );
        assert_eq!(h.data.banks.count(run.tenant_id()), 0);

        // Nothing moves until the caller acts.
        assert_eq!(
            h.finalizer.finalize_if_complete(&run),
            Err(FinalizeError::Incomplete {
                failed: Some(catalog::ACCOUNTS),
                pending: vec![catalog::BANKS, catalog::COMMODITIES],
            })
        );
        let blocked = h.orchestrator.resume(&run);
        assert_eq!(blocked.halted_at(), Some(&catalog::ACCOUNTS));
        assert_eq!(blocked.created, 0);

        let creates_before = h.ledger.creates();
        let outcome = h.orchestrator.retry(&run, &catalog::ACCOUNTS).unwrap();

        assert_eq!(h.ledger.creates() - creates_before, 53);
        assert_eq!(outcome.seeded.created, 53);
        assert_eq!(outcome.seeded.skipped, 3);
        assert_eq!(outcome.resumed, None);
        let accounts = run.snapshot();
        let accounts = accounts.task("accounts").unwrap();
        assert_eq!(accounts.progress.status, TaskStatus::Done);
        assert_eq!(accounts.progress.completed, 56);
        assert_eq!(accounts.progress.skipped, 3);
        assert_eq!(accounts.progress.error, None);

        // Retry touched only the failed task.
        assert_eq!(
            run.snapshot().keys_with_status(TaskStatus::Pending),
            vec![catalog::BANKS, catalog::COMMODITIES]
        );
        assert!(matches!(
            h.finalizer.finalize_if_complete(&run),
            Err(FinalizeError::Incomplete { failed: None, .. })
        ));

        let resumed = h.orchestrator.resume(&run);
        assert_eq!(resumed.outcome, RunOutcome::Completed);
        assert_eq!(resumed.created, 40);
        assert_eq!(h.data.record_count(run.tenant_id()), ALL_RECORDS);

        let tenant = h.finalizer.finalize_if_complete(&run).unwrap();
        assert!(tenant.configured);
    }

    #[test]
    fn advance_after_retry_finishes_remaining_tasks() {
        let config = ProvisioningConfig::from_lookup(|var| {
            (var == "COLDSTORE_ADVANCE_AFTER_RETRY").then(|| "true".to_string())
        })
        .unwrap();
        let h = Harness::new(&config);
        let run = h.orchestrator.begin(&h.register_tenant());
        h.ledger.fail_create_at(10);

        assert!(!h.orchestrator.run(&run).is_complete());
        h.orchestrator.retry(&run, &catalog::ACCOUNTS).unwrap();

        assert!(run.snapshot().all_done());
        assert_eq!(h.data.record_count(run.tenant_id()), ALL_RECORDS);
    }

    #[test]
    fn advance_after_retry_surfaces_a_later_halt() {
        let config = ProvisioningConfig {
            advance_after_retry: true,
            ..Default::default()
        };
        let h = Harness::new(&config);
        let run = h.orchestrator.begin(&h.register_tenant());
        h.banks.fail_create_at(1);
        h.commodities.fail_list.store(true, Ordering::SeqCst);

        let halted = h.orchestrator.run(&run);
        assert_eq!(halted.halted_at(), Some(&catalog::BANKS));

        let outcome = h.orchestrator.retry(&run, &catalog::BANKS).unwrap();

        assert_eq!(outcome.seeded.created, 39);
        assert_eq!(outcome.halted_at(), Some(&catalog::COMMODITIES));
        let snapshot = run.snapshot();
        assert_eq!(snapshot.task("banks").unwrap().progress.status, TaskStatus::Done);
        assert_eq!(snapshot.task("commodities").unwrap().progress.status, TaskStatus::Error);
        assert_eq!(
            h.finalizer.finalize_if_complete(&run).unwrap_err(),
            FinalizeError::Incomplete {
                failed: Some(catalog::COMMODITIES),
                pending: vec![],
            }
        );
    }

    #[test]
    fn fetch_failure_creates_nothing_for_the_task() {
        let h = Harness::new(&ProvisioningConfig::default());
        let run = h.orchestrator.begin(&h.register_tenant());
        h.ledger.fail_list.store(true, Ordering::SeqCst);

        let halted = h.orchestrator.run(&run);

        assert_eq!(halted.halted_at(), Some(&catalog::ACCOUNTS));
        assert_eq!(h.ledger.creates(), 0);
        assert_eq!(h.data.accounts.count(run.tenant_id()), 0);
        let accounts = halted.snapshot.task("accounts").unwrap();
        assert_eq!(accounts.progress.completed, 0);

        h.ledger.fail_list.store(false, Ordering::SeqCst);
        let outcome = h.orchestrator.retry(&run, &catalog::ACCOUNTS).unwrap();
        assert_eq!(outcome.seeded.created, 56);
    }

    #[test]
    fn retry_of_a_done_task_is_refused() {
        let h = Harness::new(&ProvisioningConfig::default());
        let run = h.orchestrator.begin(&h.register_tenant());
        h.orchestrator.run(&run);

        assert!(h.orchestrator.retry(&run, &catalog::TAXES).is_err());
        assert_eq!(h.data.record_count(run.tenant_id()), ALL_RECORDS);
    }

    #[test]
    fn finalizing_twice_keeps_first_timestamp() {
        let h = Harness::new(&ProvisioningConfig::default());
        let run = h.orchestrator.begin(&h.register_tenant());
        h.orchestrator.run(&run);

        let first = h.finalizer.finalize_if_complete(&run).unwrap();
        let second = h.finalizer.finalize(run.tenant_id()).unwrap();

        assert!(second.configured);
        assert_eq!(first.configured_at, second.configured_at);
        assert_eq!(h.tenants.len(), 1);
    }
}
