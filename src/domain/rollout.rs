//! The record store and the hierarchy built from it, kept in step.

use tracing::{info, instrument, warn};

use crate::domain::arena::SiteTree;
use crate::domain::builder::TreeBuilder;
use crate::domain::entities::{DomainPolicy, SiteRecord, SiteUpdate};
use crate::domain::error::{DomainResult, OrphanRecord};
use crate::domain::store::SiteStore;

#[derive(Debug, Clone)]
pub struct Rollout {
    store: SiteStore,
    tree: SiteTree,
    orphans: Vec<OrphanRecord>,
}

impl Rollout {
    /// Build the hierarchy and index the records it was built from.
    #[instrument(level = "debug", skip(records), fields(records = records.len()))]
    pub fn build(records: Vec<SiteRecord>, policy: DomainPolicy) -> DomainResult<Self> {
        let outcome = TreeBuilder::new(policy).build(&records)?;
        Ok(Self {
            store: SiteStore::new(records),
            tree: outcome.tree,
            orphans: outcome.orphans,
        })
    }

    pub fn store(&self) -> &SiteStore {
        &self.store
    }

    pub fn tree(&self) -> &SiteTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SiteTree {
        &mut self.tree
    }

    pub fn orphans(&self) -> &[OrphanRecord] {
        &self.orphans
    }

    /// Write the three readiness flags to the record and to its live node.
    ///
    /// Links, grandmaster and every other field are left alone. An unknown
    /// site id is an error and changes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_update(&mut self, update: &SiteUpdate) -> DomainResult<()> {
        self.store.apply(update)?;

        let node = self
            .tree
            .find(&update.site_id)
            .and_then(|idx| self.tree.get_node_mut(idx));
        match node {
            Some(node) => node.record.apply(update),
            None => warn!(
                "site {} updated in store but is not attached to the hierarchy",
                update.site_id
            ),
        }
        info!("flags updated for site: {}", update.site_id);
        Ok(())
    }
}
