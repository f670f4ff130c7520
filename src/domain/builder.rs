//! Tree builder: turns the flat site sheet into the grandmaster hierarchy.

use std::collections::{HashMap, HashSet, VecDeque};

use generational_arena::Index;
use tracing::{debug, info, instrument, warn};

use crate::domain::arena::{NodeKind, SiteTree};
use crate::domain::entities::{DomainPolicy, SiteRecord};
use crate::domain::error::{DomainError, DomainResult, OrphanReason, OrphanRecord};

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub tree: SiteTree,
    /// Records that could not be attached under any grandmaster
    pub orphans: Vec<OrphanRecord>,
}

/// Constructs the site hierarchy from flat records.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    policy: DomainPolicy,
}

impl TreeBuilder {
    pub fn new(policy: DomainPolicy) -> Self {
        Self { policy }
    }

    /// Build the hierarchy `GPS -> region -> grandmaster -> ... -> site`.
    ///
    /// Children are found through an index keyed by upper sync source, built
    /// once, so the whole build is linear in the number of records. Records
    /// that never resolve to a grandmaster are returned as orphans instead of
    /// being dropped.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: &[SiteRecord]) -> DomainResult<BuildOutcome> {
        if records.is_empty() {
            return Err(DomainError::Configuration(
                "no site records to build the hierarchy from".to_string(),
            ));
        }

        let mut known = HashSet::with_capacity(records.len());
        for record in records {
            if !known.insert(record.site_id.as_str()) {
                return Err(DomainError::Configuration(format!(
                    "duplicate site id: {}",
                    record.site_id
                )));
            }
        }

        let (roots, others): (Vec<&SiteRecord>, Vec<&SiteRecord>) =
            records.iter().partition(|record| record.is_grandmaster());
        if roots.is_empty() {
            return Err(DomainError::Configuration(
                "no grandmaster site (sync solution 'Local to GM') in record set".to_string(),
            ));
        }

        let mut children_of: HashMap<&str, Vec<&SiteRecord>> = HashMap::new();
        for record in &others {
            if let Some(source) = record.upper_sync_source_site_id.as_deref() {
                children_of.entry(source).or_default().push(record);
            }
        }

        let mut tree = SiteTree::new(self.policy.clone());
        let mut regions: HashMap<&str, Index> = HashMap::new();
        let mut queue: VecDeque<(&str, Index, &str)> = VecDeque::new();

        for root in &roots {
            let region_idx = match regions.get(root.region.as_str()) {
                Some(&idx) => idx,
                None => {
                    let idx = tree.insert_node(
                        SiteRecord::region_node(&root.region),
                        NodeKind::Region,
                        tree.root(),
                        None,
                    );
                    debug!("region node: {}", root.region);
                    regions.insert(root.region.as_str(), idx);
                    idx
                }
            };
            let idx = tree.insert_node(
                (*root).clone(),
                NodeKind::Site,
                region_idx,
                Some(root.site_id.clone()),
            );
            queue.push_back((root.site_id.as_str(), idx, root.site_id.as_str()));
        }

        while let Some((site_id, parent_idx, grandmaster)) = queue.pop_front() {
            let Some(children) = children_of.get(site_id) else {
                continue;
            };
            for child in children {
                let idx = tree.insert_node(
                    (*child).clone(),
                    NodeKind::Site,
                    parent_idx,
                    Some(grandmaster.to_string()),
                );
                queue.push_back((child.site_id.as_str(), idx, grandmaster));
            }
        }

        let orphans: Vec<OrphanRecord> = others
            .iter()
            .filter(|record| tree.find(&record.site_id).is_none())
            .map(|record| {
                let source = record.upper_sync_source_site_id.as_deref();
                let reason = match source {
                    Some(source) if known.contains(source) => OrphanReason::UnreachableSource,
                    _ => OrphanReason::MissingSource,
                };
                OrphanRecord {
                    site_id: record.site_id.clone(),
                    upper_sync_source_site_id: source.map(str::to_string),
                    reason,
                }
            })
            .collect();

        if !orphans.is_empty() {
            warn!(
                "{} site(s) not attached to any grandmaster: {}",
                orphans.len(),
                orphans.iter().map(|o| o.site_id.as_str()).collect::<Vec<_>>().join(", ")
            );
        }
        info!(
            sites = tree.site_count(),
            regions = regions.len(),
            grandmasters = roots.len(),
            "site hierarchy built"
        );

        Ok(BuildOutcome { tree, orphans })
    }
}

/// Build the hierarchy with the given domain policy.
pub fn build_tree(records: &[SiteRecord], policy: DomainPolicy) -> DomainResult<BuildOutcome> {
    TreeBuilder::new(policy).build(records)
}
