//! I/O boundary traits for testability
//!
//! The rollout core only sees parsed records. Where they come from and where
//! updates are written back is abstracted here.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::SiteRecord;

/// Source of truth for site records.
pub trait RecordSource: Send + Sync {
    /// Human-readable location, used in error messages.
    fn describe(&self) -> String;

    /// Load all site records.
    fn load(&self) -> io::Result<Vec<SiteRecord>>;

    /// Replace all site records.
    fn save(&self, records: &[SiteRecord]) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

#[derive(Deserialize)]
struct SiteSheet {
    #[serde(default)]
    site: Vec<SiteRecord>,
}

#[derive(Serialize)]
struct SiteSheetRef<'a> {
    site: &'a [SiteRecord],
}

/// Site sheet stored as a TOML file of `[[site]]` tables.
#[derive(Debug, Clone)]
pub struct TomlRecordFile {
    path: PathBuf,
}

impl TomlRecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for TomlRecordFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> io::Result<Vec<SiteRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        let sheet: SiteSheet = toml::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(sheet.site)
    }

    /// Writes a temp file next to the sheet and renames it over the sheet.
    fn save(&self, records: &[SiteRecord]) -> io::Result<()> {
        let content = toml::to_string(&SiteSheetRef { site: records })
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Records held in memory; saves replace them. Used by tests and embedding callers.
#[derive(Debug, Default)]
pub struct InMemoryRecordSource {
    records: Mutex<Vec<SiteRecord>>,
}

impl InMemoryRecordSource {
    pub fn new(records: Vec<SiteRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Current contents, including anything saved since creation.
    pub fn records(&self) -> Vec<SiteRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the contents, as an external edit of the sheet would.
    pub fn replace(&self, records: Vec<SiteRecord>) {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
    }
}

impl RecordSource for InMemoryRecordSource {
    fn describe(&self) -> String {
        "in-memory records".to_string()
    }

    fn load(&self) -> io::Result<Vec<SiteRecord>> {
        Ok(self.records())
    }

    fn save(&self, records: &[SiteRecord]) -> io::Result<()> {
        self.replace(records.to_vec());
        Ok(())
    }
}
