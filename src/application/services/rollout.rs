//! Rollout service
//!
//! Owns the process-wide rollout state behind a reader-writer lock. Readers
//! always see a whole tree: updates hold the write lock for all three flags
//! and reloads build the new tree aside before swapping it in.
//!
//! Every update takes a revision under the write lock. Saves run outside that
//! lock but one at a time, and a snapshot older than the last saved revision
//! is dropped, so the source never moves back to an earlier state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    classify_all, compute_dependencies, compute_statistics, project_report, DependencyEdge,
    DomainPolicy, OrphanRecord, Report, ReportKind, Rollout, RolloutStats, SiteRecord, SiteTree,
    SiteUpdate,
};
use crate::infrastructure::traits::RecordSource;

/// Service for querying and updating the rollout hierarchy.
pub struct RolloutService {
    source: Arc<dyn RecordSource>,
    policy: DomainPolicy,
    state: RwLock<Rollout>,
    /// Revision of the latest in-memory update
    revision: AtomicU64,
    /// Revision last written through the source
    persisted: Mutex<u64>,
}

impl RolloutService {
    /// Load records from `source` and build the initial hierarchy.
    #[instrument(level = "debug", skip(source))]
    pub fn load(source: Arc<dyn RecordSource>, policy: DomainPolicy) -> ApplicationResult<Self> {
        let rollout = Self::build_from(source.as_ref(), &policy)?;
        Ok(Self {
            source,
            policy,
            state: RwLock::new(rollout),
            revision: AtomicU64::new(0),
            persisted: Mutex::new(0),
        })
    }

    fn build_from(source: &dyn RecordSource, policy: &DomainPolicy) -> ApplicationResult<Rollout> {
        let records = source
            .load()
            .with_context("load site records", &source.describe())?;
        debug!("loaded {} records from {}", records.len(), source.describe());
        Ok(Rollout::build(records, policy.clone())?)
    }

    fn read(&self) -> RwLockReadGuard<'_, Rollout> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rollout> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild from the record source and swap the new tree in.
    ///
    /// On failure the current tree stays in place.
    #[instrument(level = "debug", skip(self))]
    pub fn reload(&self) -> ApplicationResult<()> {
        let rollout = Self::build_from(self.source.as_ref(), &self.policy)?;
        let sites = rollout.tree().site_count();
        *self.write() = rollout;
        info!("rollout reloaded: {} sites", sites);
        Ok(())
    }

    /// Apply a flag update, then persist the records through the source.
    ///
    /// The in-memory update stands even if persisting fails. When a later
    /// update has already been saved, its snapshot contains this one and the
    /// save is skipped.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_update(&self, update: &SiteUpdate) -> ApplicationResult<()> {
        let (revision, snapshot) = {
            let mut state = self.write();
            state.apply_update(update)?;
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            (revision, state.store().records().to_vec())
        };

        let mut persisted = self.persisted.lock().unwrap_or_else(PoisonError::into_inner);
        if *persisted >= revision {
            debug!(revision, saved = *persisted, "newer snapshot already saved");
            return Ok(());
        }
        self.source
            .save(&snapshot)
            .with_context("save site records", &self.source.describe())?;
        *persisted = revision;
        Ok(())
    }

    /// Classify every node and return a snapshot of the tree for rendering.
    pub fn classified_tree(&self) -> SiteTree {
        let mut state = self.write();
        classify_all(state.tree_mut());
        state.tree().clone()
    }

    pub fn statistics(&self) -> RolloutStats {
        compute_statistics(self.read().tree())
    }

    pub fn dependencies(&self) -> Vec<DependencyEdge> {
        compute_dependencies(self.read().tree())
    }

    pub fn report(&self, kind: ReportKind) -> Report {
        project_report(self.read().tree(), kind)
    }

    pub fn orphans(&self) -> Vec<OrphanRecord> {
        self.read().orphans().to_vec()
    }

    pub fn record(&self, site_id: &str) -> Option<SiteRecord> {
        self.read().store().get(site_id).cloned()
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }
}
