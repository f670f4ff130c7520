//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Domain errors represent rollout rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("site not found: {0}")]
    NotFound(String),

    #[error("unknown report type: {0}")]
    UnknownReport(String),

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why a record could not be attached to the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
    /// No source link, or the source site is not in the record set
    MissingSource,
    /// The source site exists but is itself unattached (includes cycles)
    UnreachableSource,
}

/// A record left out of the hierarchy. Non-fatal: collected during build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanRecord {
    pub site_id: String,
    pub upper_sync_source_site_id: Option<String>,
    pub reason: OrphanReason,
}

impl fmt::Display for OrphanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.upper_sync_source_site_id.as_deref().unwrap_or("-");
        match self.reason {
            OrphanReason::MissingSource => {
                write!(f, "{} (source {} not found)", self.site_id, source)
            }
            OrphanReason::UnreachableSource => {
                write!(f, "{} (source {} not attached to any grandmaster)", self.site_id, source)
            }
        }
    }
}
