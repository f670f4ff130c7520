//! Flat report projections for the planners' CSV exports.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use itertools::Itertools;
use tracing::instrument;

use crate::domain::arena::{SiteTree, TreeNode};
use crate::domain::classify::{Classifier, SyncStatus};
use crate::domain::dependency::{compute_dependencies, nearest_access_anchor};
use crate::domain::error::DomainError;

/// Named report types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Transport and access dependency of every tracked site
    DependencyReport,
    /// One line per tracked site with its place in the hierarchy
    MasterSheet,
    /// Sites blocked by an ancestor although their scope of work is issued
    SowIssuedBlockedParent,
    /// Sites free of blockers that do not depend on any access link
    NoBlockageNoInBand,
    /// Transport legs and the tracked sites waiting on each
    TransportPorts,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::DependencyReport,
        ReportKind::MasterSheet,
        ReportKind::SowIssuedBlockedParent,
        ReportKind::NoBlockageNoInBand,
        ReportKind::TransportPorts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::DependencyReport => "dependency-report",
            ReportKind::MasterSheet => "master-sheet",
            ReportKind::SowIssuedBlockedParent => "sow-issued-blocked-parent",
            ReportKind::NoBlockageNoInBand => "no-blockage-no-in-band",
            ReportKind::TransportPorts => "transport-ports",
        }
    }

    /// Name used by the dashboard's report dropdown.
    fn dashboard_alias(self) -> &'static str {
        match self {
            ReportKind::DependencyReport => "blockedByParent",
            ReportKind::MasterSheet => "masterSheet",
            ReportKind::SowIssuedBlockedParent => "sowIssuedBlockedParent",
            ReportKind::NoBlockageNoInBand => "noBlockageNoInBand",
            ReportKind::TransportPorts => "transportPorts",
        }
    }

    fn headers(self) -> &'static [&'static str] {
        match self {
            ReportKind::DependencyReport => &["SiteID", "TransportDependency", "AccessDependency"],
            ReportKind::MasterSheet => {
                &["Region", "SiteID", "SyncSolution", "UpperSyncSource", "GrandMaster"]
            }
            ReportKind::SowIssuedBlockedParent => &["SiteID", "Status", "GrandMaster"],
            ReportKind::NoBlockageNoInBand => &["SiteID", "SyncSolution", "Status"],
            ReportKind::TransportPorts => &["TransportLeg", "DependentSites"],
        }
    }
}

impl FromStr for ReportKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.dashboard_alias() == s)
            .ok_or_else(|| DomainError::UnknownReport(s.to_string()))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header plus rows of ordered string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Project the tree into the rows of `kind`. Rows follow level order unless
/// the report groups them.
#[instrument(level = "debug", skip(tree))]
pub fn project_report(tree: &SiteTree, kind: ReportKind) -> Report {
    let rows: Vec<Vec<String>> = match kind {
        ReportKind::DependencyReport => compute_dependencies(tree)
            .into_iter()
            .map(|edge| {
                vec![
                    edge.site_id,
                    edge.transport_dependency.unwrap_or_default(),
                    edge.access_dependency.unwrap_or_default(),
                ]
            })
            .collect(),
        ReportKind::MasterSheet => tracked_sites(tree)
            .map(|(_, node, _)| {
                vec![
                    node.record.region.clone(),
                    node.record.site_id.clone(),
                    node.record.sync_solution.to_string(),
                    node.record.upper_sync_source_site_id.clone().unwrap_or_default(),
                    node.grandmaster_site_id.clone().unwrap_or_default(),
                ]
            })
            .collect(),
        ReportKind::SowIssuedBlockedParent => tracked_sites(tree)
            .filter(|(_, node, status)| {
                status.is_blocked_by_parent() && node.record.scope_of_work_issued
            })
            .map(|(_, node, status)| {
                vec![
                    node.record.site_id.clone(),
                    status.to_string(),
                    node.grandmaster_site_id.clone().unwrap_or_default(),
                ]
            })
            .collect(),
        ReportKind::NoBlockageNoInBand => tracked_sites(tree)
            .filter(|(idx, _, status)| {
                matches!(
                    status,
                    SyncStatus::ReadyByDesign | SyncStatus::PendingTransmission
                ) && nearest_access_anchor(tree, *idx).is_none()
            })
            .map(|(_, node, status)| {
                vec![
                    node.record.site_id.clone(),
                    node.record.sync_solution.to_string(),
                    status.to_string(),
                ]
            })
            .collect(),
        ReportKind::TransportPorts => {
            let legs = compute_dependencies(tree)
                .into_iter()
                .filter_map(|edge| edge.transport_dependency.map(|leg| (leg, edge.site_id)))
                .sorted_by(|a, b| a.0.cmp(&b.0))
                .chunk_by(|(leg, _)| leg.clone());
            let mut rows = Vec::new();
            for (leg, sites) in &legs {
                rows.push(vec![leg, sites.map(|(_, site)| site).join(";")]);
            }
            rows
        }
    };

    Report {
        kind,
        headers: kind.headers().iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// Tracked sites in level order with their current classification.
fn tracked_sites(
    tree: &SiteTree,
) -> impl Iterator<Item = (Index, &TreeNode, SyncStatus)> + '_ {
    let classifier = Classifier::new(tree);
    tree.iter_level_order().filter_map(move |(idx, node)| {
        let status = classifier.classify(idx);
        (status != SyncStatus::Dropped).then_some((idx, node, status))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_dashboard_alias_when_parsing_then_resolves_kind() {
        assert_eq!(
            "blockedByParent".parse::<ReportKind>().unwrap(),
            ReportKind::DependencyReport
        );
        assert_eq!(
            "master-sheet".parse::<ReportKind>().unwrap(),
            ReportKind::MasterSheet
        );
    }

    #[test]
    fn given_unknown_name_when_parsing_then_errors() {
        assert_eq!(
            "bogus".parse::<ReportKind>(),
            Err(DomainError::UnknownReport("bogus".into()))
        );
    }
}
