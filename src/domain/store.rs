//! Site record store: the source-of-truth records indexed by site id.

use std::collections::HashMap;

use crate::domain::entities::{SiteRecord, SiteUpdate};
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Default)]
pub struct SiteStore {
    records: Vec<SiteRecord>,
    index: HashMap<String, usize>,
}

impl SiteStore {
    /// Index records by site id. On duplicate ids the last record wins the
    /// lookup; the tree builder rejects such sets before a store is created.
    pub fn new(records: Vec<SiteRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.site_id.clone(), pos))
            .collect();
        Self { records, index }
    }

    pub fn get(&self, site_id: &str) -> Option<&SiteRecord> {
        self.index.get(site_id).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    pub(crate) fn apply(&mut self, update: &SiteUpdate) -> DomainResult<()> {
        let pos = *self
            .index
            .get(&update.site_id)
            .ok_or_else(|| DomainError::NotFound(update.site_id.clone()))?;
        self.records[pos].apply(update);
        Ok(())
    }
}
