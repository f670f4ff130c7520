//! Per-site rollout status and the dashboard colors derived from it.

use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::SiteTree;
use crate::domain::blocking::{blocked_by_ancestor_design, blocked_by_ancestor_sync, BlockingIndex};
use crate::domain::entities::SyncSolution;

/// Rollout state of one node. Variants are listed in rule priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncStatus {
    /// Outside the tracked domain, structural only
    #[default]
    Dropped,
    InSync,
    BlockedLocally,
    BlockedByParentDesign,
    BlockedByParentSync,
    PendingTransmission,
    ReadyByDesign,
}

impl SyncStatus {
    pub fn colors(self) -> StatusColors {
        use Color::*;
        let (implementation, design) = match self {
            SyncStatus::Dropped => (Black, Black),
            SyncStatus::InSync => (LimeGreen, LimeGreen),
            SyncStatus::BlockedLocally => (Red, Red),
            SyncStatus::BlockedByParentDesign => (Red, RoyalBlue),
            SyncStatus::BlockedByParentSync => (Gray, RoyalBlue),
            SyncStatus::PendingTransmission => (Orange, RoyalBlue),
            SyncStatus::ReadyByDesign => (RoyalBlue, RoyalBlue),
        };
        StatusColors {
            implementation,
            design,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SyncStatus::Dropped => "Dropped",
            SyncStatus::InSync => "In Sync",
            SyncStatus::BlockedLocally => "Blocked",
            SyncStatus::BlockedByParentDesign => "Blocked by Parent Design",
            SyncStatus::BlockedByParentSync => "Blocked by Parent Sync",
            SyncStatus::PendingTransmission => "Pending Transmission",
            SyncStatus::ReadyByDesign => "Ready by Design",
        }
    }

    pub fn is_blocked_by_parent(self) -> bool {
        matches!(
            self,
            SyncStatus::BlockedByParentDesign | SyncStatus::BlockedByParentSync
        )
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dashboard color, named as the web front end expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    LimeGreen,
    Red,
    RoyalBlue,
    Gray,
    Orange,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Black => "black",
            Color::LimeGreen => "LimeGreen",
            Color::Red => "red",
            Color::RoyalBlue => "RoyalBlue",
            Color::Gray => "Gray",
            Color::Orange => "Orange",
        };
        f.write_str(name)
    }
}

/// Implementation view and design view colors of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColors {
    pub implementation: Color,
    pub design: Color,
}

/// First matching rule wins; the ancestor checks only run when reached.
fn derive_status(
    tree: &SiteTree,
    idx: Index,
    blocked_by_design: impl FnOnce() -> bool,
    blocked_by_sync: impl FnOnce() -> bool,
) -> SyncStatus {
    let Some(node) = tree.get_node(idx) else {
        return SyncStatus::Dropped;
    };
    let policy = tree.policy();
    let record = &node.record;

    if !node.is_site() || !policy.is_tracked(&record.domain) {
        SyncStatus::Dropped
    } else if record.ip_transport_in_sync {
        SyncStatus::InSync
    } else if !record.site_doable {
        SyncStatus::BlockedLocally
    } else if blocked_by_design() {
        SyncStatus::BlockedByParentDesign
    } else if blocked_by_sync() {
        SyncStatus::BlockedByParentSync
    } else if record.sync_solution.is_local() && !record.transmission_in_sync {
        SyncStatus::PendingTransmission
    } else if record.sync_solution == SyncSolution::DedicatedDf
        && record
            .upper_sync_source_domain
            .as_ref()
            .is_some_and(|domain| policy.is_transport(domain))
        && !tree
            .parent_of(idx)
            .is_some_and(|parent| parent.record.transmission_in_sync)
    {
        SyncStatus::PendingTransmission
    } else {
        SyncStatus::ReadyByDesign
    }
}

/// Classify a single node, walking its ancestors as needed.
pub fn classify(tree: &SiteTree, idx: Index) -> SyncStatus {
    derive_status(
        tree,
        idx,
        || blocked_by_ancestor_design(tree, idx),
        || blocked_by_ancestor_sync(tree, idx),
    )
}

/// Whole-tree classifier backed by a precomputed [`BlockingIndex`].
pub struct Classifier<'a> {
    tree: &'a SiteTree,
    index: BlockingIndex,
}

impl<'a> Classifier<'a> {
    pub fn new(tree: &'a SiteTree) -> Self {
        Self {
            tree,
            index: BlockingIndex::compute(tree),
        }
    }

    pub fn classify(&self, idx: Index) -> SyncStatus {
        let blockers = self.index.get(idx);
        let record = self.tree.get_node(idx).map(|node| &node.record);
        derive_status(
            self.tree,
            idx,
            || record.is_some_and(|r| blockers.blocks_design(r)),
            || record.is_some_and(|r| blockers.blocks_sync(r)),
        )
    }
}

/// Stamp status and colors on every node, level order from the hierarchy root.
#[instrument(level = "debug", skip(tree))]
pub fn classify_all(tree: &mut SiteTree) {
    let statuses: Vec<(Index, SyncStatus)> = {
        let classifier = Classifier::new(tree);
        tree.level_order_indices()
            .into_iter()
            .map(|idx| (idx, classifier.classify(idx)))
            .collect()
    };
    debug!("classified {} nodes", statuses.len());
    for (idx, status) in statuses {
        if let Some(node) = tree.get_node_mut(idx) {
            node.status = status;
        }
    }
}
