//! Blocking propagation along the sync path.
//!
//! A tracked site is blocked by an ancestor when some tracked ancestor is not
//! ready (not doable for design, not in sync for implementation) and either
//! the site or that ancestor receives timing over an access link.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{SiteTree, TreeNode};
use crate::domain::entities::{DomainPolicy, SiteRecord};

fn is_tracked_site(node: &TreeNode, policy: &DomainPolicy) -> bool {
    node.is_site() && policy.is_tracked(&node.record.domain)
}

/// True if an ancestor's design blocks `idx`. Walks upward, stops at the first match.
pub fn blocked_by_ancestor_design(tree: &SiteTree, idx: Index) -> bool {
    blocked_by_ancestor(tree, idx, |ancestor| !ancestor.site_doable)
}

/// True if an ancestor's missing IP transport sync blocks `idx`.
pub fn blocked_by_ancestor_sync(tree: &SiteTree, idx: Index) -> bool {
    blocked_by_ancestor(tree, idx, |ancestor| !ancestor.ip_transport_in_sync)
}

fn blocked_by_ancestor(
    tree: &SiteTree,
    idx: Index,
    not_ready: impl Fn(&SiteRecord) -> bool,
) -> bool {
    let Some(node) = tree.get_node(idx) else {
        return false;
    };
    let policy = tree.policy();
    let via_access = node.record.sync_solution.is_access_link();
    tree.ancestors(idx).any(|(_, ancestor)| {
        is_tracked_site(ancestor, policy)
            && not_ready(&ancestor.record)
            && (via_access || ancestor.record.sync_solution.is_access_link())
    })
}

/// What the strict ancestors of a node contribute to its blocking state.
///
/// `blocks_design`/`blocks_sync` give the same answers as the upward walks,
/// but a summary for a child is derived from its parent's in O(1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AncestorBlockers {
    undoable: bool,
    undoable_on_access_link: bool,
    unsynced: bool,
    unsynced_on_access_link: bool,
}

impl AncestorBlockers {
    /// Compute the summary for `idx` by walking its ancestors.
    pub fn walk(tree: &SiteTree, idx: Index) -> Self {
        tree.ancestors(idx)
            .fold(Self::default(), |acc, (_, ancestor)| acc.extend(ancestor, tree.policy()))
    }

    /// Summary for a child of `parent`, where `self` is the parent's summary.
    fn extend(self, parent: &TreeNode, policy: &DomainPolicy) -> Self {
        if !is_tracked_site(parent, policy) {
            return self;
        }
        let record = &parent.record;
        let access = record.sync_solution.is_access_link();
        Self {
            undoable: self.undoable || !record.site_doable,
            undoable_on_access_link: self.undoable_on_access_link
                || (!record.site_doable && access),
            unsynced: self.unsynced || !record.ip_transport_in_sync,
            unsynced_on_access_link: self.unsynced_on_access_link
                || (!record.ip_transport_in_sync && access),
        }
    }

    pub fn blocks_design(&self, record: &SiteRecord) -> bool {
        self.undoable_on_access_link || (self.undoable && record.sync_solution.is_access_link())
    }

    pub fn blocks_sync(&self, record: &SiteRecord) -> bool {
        self.unsynced_on_access_link || (self.unsynced && record.sync_solution.is_access_link())
    }
}

/// Ancestor summaries for every node, computed in one top-down pass.
#[derive(Debug, Clone, Default)]
pub struct BlockingIndex {
    by_node: HashMap<Index, AncestorBlockers>,
}

impl BlockingIndex {
    #[instrument(level = "debug", skip(tree))]
    pub fn compute(tree: &SiteTree) -> Self {
        let mut by_node = HashMap::with_capacity(tree.site_count() + 1);
        by_node.insert(tree.root(), AncestorBlockers::default());
        for (idx, node) in tree.iter_level_order() {
            let own = by_node.get(&idx).copied().unwrap_or_default();
            let inherited = own.extend(node, tree.policy());
            for &child in &node.children {
                by_node.insert(child, inherited);
            }
        }
        Self { by_node }
    }

    pub fn get(&self, idx: Index) -> AncestorBlockers {
        self.by_node.get(&idx).copied().unwrap_or_default()
    }
}
