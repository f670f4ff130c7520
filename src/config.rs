//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/synctrack/synctrack.toml`
//! 3. Local config: `./.synctrack.toml`, or the file given with `--config`
//! 4. Environment variables: `SYNCTRACK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Domain, DomainPolicy};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".synctrack.toml";

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub tracked_domain: Option<String>,
    pub transport_domain: Option<String>,
}

/// Unified configuration for synctrack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// TOML sheet with the `[[site]]` records
    pub data_file: PathBuf,
    /// Access-network domain whose rollout is tracked
    pub tracked_domain: String,
    /// Transmission domain tracked sites depend on
    pub transport_domain: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/sites.toml"),
            tracked_domain: Domain::Ipmpls.to_string(),
            transport_domain: Domain::Dwdm.to_string(),
        }
    }
}

/// Get the XDG config directory for synctrack.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "synctrack").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("synctrack.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned unchanged.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Domain policy for the rollout core.
    pub fn policy(&self) -> DomainPolicy {
        DomainPolicy {
            tracked: Domain::from(self.tracked_domain.clone()),
            transport: Domain::from(self.transport_domain.clone()),
        }
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            tracked_domain: overlay
                .tracked_domain
                .clone()
                .unwrap_or_else(|| self.tracked_domain.clone()),
            transport_domain: overlay
                .transport_domain
                .clone()
                .unwrap_or_else(|| self.transport_domain.clone()),
        }
    }

    /// Replace the data file, expanding it the same way loaded paths are.
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self.expand_paths();
        self
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Explicit local config file; it must exist. When
    ///   `None`, `./.synctrack.toml` is used if present.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        match local_config {
            Some(path) => current = current.merge_with(&load_raw_settings(path)?),
            None => {
                let path = Path::new(LOCAL_CONFIG_FILE);
                if path.exists() {
                    current = current.merge_with(&load_raw_settings(path)?);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply SYNCTRACK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SYNCTRACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("tracked_domain") {
            settings.tracked_domain = val;
        }
        if let Ok(val) = config.get_string("transport_domain") {
            settings.transport_domain = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
