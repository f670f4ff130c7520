//! Service container for dependency injection
//!
//! Wires the record source and settings into the rollout service.

use std::sync::Arc;

use crate::application::services::RolloutService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{RecordSource, TomlRecordFile};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Site record source
    pub source: Arc<dyn RecordSource>,

    /// Rollout state built from the source
    pub rollout: RolloutService,
}

impl ServiceContainer {
    /// Create a container reading the TOML sheet named in the settings.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let source = Arc::new(TomlRecordFile::new(settings.data_file.clone()));
        Self::with_deps(settings, source)
    }

    /// Create a container with a custom record source (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn RecordSource>) -> ApplicationResult<Self> {
        let policy = settings.policy();
        let rollout = RolloutService::load(source.clone(), policy)?;

        Ok(Self {
            settings: Arc::new(settings),
            source,
            rollout,
        })
    }
}
