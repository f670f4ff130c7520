//! Rollout-wide counters for the dashboard legend.

use serde::Serialize;
use tracing::instrument;

use crate::domain::arena::SiteTree;
use crate::domain::classify::{Classifier, SyncStatus};

/// Counters over all tracked sites. Every tracked site lands in exactly one
/// of the status buckets; ready sites are further split by paperwork state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolloutStats {
    pub total_tracked_sites: usize,
    pub in_sync_sites_count: usize,
    pub total_blocked_locally: usize,
    pub blocked_by_parents_design: usize,
    pub pending_parents_sync: usize,
    pub pending_transmission: usize,
    pub ready_by_design: usize,
    pub total_sow_and_tech_data: usize,
    pub total_sow_no_tech_data: usize,
    pub total_doable_no_sow: usize,
    /// Blocked locally or by parent sync although the scope of work is issued
    pub blocked_issued_sow: usize,
    pub total_blocked_sites: usize,
    pub total_affected_by_parent: usize,
}

impl RolloutStats {
    /// Sum of the mutually exclusive status buckets.
    pub fn bucket_total(&self) -> usize {
        self.in_sync_sites_count
            + self.total_blocked_locally
            + self.blocked_by_parents_design
            + self.pending_parents_sync
            + self.pending_transmission
            + self.ready_by_design
    }
}

/// Recount every tracked site from current node state.
#[instrument(level = "debug", skip(tree))]
pub fn compute_statistics(tree: &SiteTree) -> RolloutStats {
    let classifier = Classifier::new(tree);
    let mut stats = RolloutStats::default();

    for (idx, node) in tree.iter_level_order() {
        let status = classifier.classify(idx);
        if status == SyncStatus::Dropped {
            continue;
        }
        let record = &node.record;
        stats.total_tracked_sites += 1;
        match status {
            SyncStatus::InSync => stats.in_sync_sites_count += 1,
            SyncStatus::BlockedLocally => {
                stats.total_blocked_locally += 1;
                if record.scope_of_work_issued {
                    stats.blocked_issued_sow += 1;
                }
            }
            SyncStatus::BlockedByParentDesign => stats.blocked_by_parents_design += 1,
            SyncStatus::BlockedByParentSync => {
                stats.pending_parents_sync += 1;
                if record.scope_of_work_issued {
                    stats.blocked_issued_sow += 1;
                }
            }
            SyncStatus::PendingTransmission => stats.pending_transmission += 1,
            SyncStatus::ReadyByDesign => {
                stats.ready_by_design += 1;
                match (record.scope_of_work_issued, record.tech_data_provided) {
                    (true, true) => stats.total_sow_and_tech_data += 1,
                    (true, false) => stats.total_sow_no_tech_data += 1,
                    (false, _) => stats.total_doable_no_sow += 1,
                }
            }
            SyncStatus::Dropped => {}
        }
    }

    stats.total_affected_by_parent = stats.blocked_by_parents_design + stats.pending_parents_sync;
    stats.total_blocked_sites = stats.total_blocked_locally + stats.total_affected_by_parent;
    stats
}
