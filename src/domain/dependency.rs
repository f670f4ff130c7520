//! Cross-domain dependency edges: which transport leg and which access leg
//! must be completed before a tracked site can be synchronized.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::SiteTree;
use crate::domain::entities::SyncSolution;

/// Upstream dependencies of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub site_id: String,
    /// Transport leg this site waits for, e.g. `S1_DWDM`
    pub transport_dependency: Option<String>,
    /// Access leg this site waits for, e.g. `S0_IPMPLS`
    pub access_dependency: Option<String>,
}

/// Nearest node on the path `[idx, ancestors...]` that is a tracked site fed by an access link.
pub fn nearest_access_anchor(tree: &SiteTree, idx: Index) -> Option<Index> {
    let policy = tree.policy();
    let node = tree.get_node(idx)?;
    std::iter::once((idx, node))
        .chain(tree.ancestors(idx))
        .find(|(_, candidate)| {
            candidate.is_site()
                && policy.is_tracked(&candidate.record.domain)
                && candidate.record.sync_solution.is_access_link()
        })
        .map(|(anchor, _)| anchor)
}

/// Resolve the dependencies of one node.
///
/// Nodes outside the tracked domain yield their id with no dependencies.
pub fn resolve(tree: &SiteTree, idx: Index) -> Option<DependencyEdge> {
    let node = tree.get_node(idx)?;
    let policy = tree.policy();
    let record = &node.record;
    let mut edge = DependencyEdge {
        site_id: record.site_id.clone(),
        transport_dependency: None,
        access_dependency: None,
    };
    if !node.is_site() || !policy.is_tracked(&record.domain) {
        return Some(edge);
    }

    let anchor = nearest_access_anchor(tree, idx);

    if record.sync_solution.is_local() {
        edge.transport_dependency = Some(policy.transport_leg(&record.site_id));
    } else if anchor.is_some() && record.sync_solution == SyncSolution::DedicatedDf {
        edge.transport_dependency = tree
            .parent_of(idx)
            .filter(|parent| policy.is_transport(&parent.record.domain))
            .map(|parent| policy.transport_leg(&parent.record.site_id));
    }

    edge.access_dependency = anchor
        .and_then(|anchor| tree.get_node(anchor))
        .map(|anchor| policy.access_leg(&anchor.record.site_id));

    Some(edge)
}

/// Dependency edges for every tracked site, level order.
#[instrument(level = "debug", skip(tree))]
pub fn compute_dependencies(tree: &SiteTree) -> Vec<DependencyEdge> {
    let policy = tree.policy();
    tree.iter_level_order()
        .filter(|(_, node)| node.is_site() && policy.is_tracked(&node.record.domain))
        .filter_map(|(idx, _)| resolve(tree, idx))
        .collect()
}
