//! Selection and engine configuration, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::mimc::DEFAULT_DOMAIN;
use crate::errors::ConfigError;
use crate::gadgets::range::MAX_BOUND;

pub const DEFAULT_MAX: u64 = 72;

fn default_max() -> u64 {
    DEFAULT_MAX
}

fn default_domain_label() -> String {
    DEFAULT_DOMAIN.to_string()
}

/// Parameters of the bounded selection, fixed when a circuit is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Number of artifacts; selected indices fall in `[0, max)`.
    #[serde(default = "default_max")]
    pub max: u64,
    /// Domain label of the MiMC round constants.
    #[serde(default = "default_domain_label")]
    pub domain_label: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX,
            domain_label: default_domain_label(),
        }
    }
}

impl SelectionConfig {
    pub fn with_max(max: u64) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max == 0 || self.max > MAX_BOUND {
            return Err(ConfigError::Invalid(format!(
                "max {} out of allowed range [1..{}]",
                self.max, MAX_BOUND
            )));
        }
        if self.domain_label.is_empty() {
            return Err(ConfigError::Invalid("domain_label cannot be empty".into()));
        }
        Ok(())
    }
}

fn default_curve() -> String {
    "bn254".to_string()
}

fn default_scheme() -> String {
    "native".to_string()
}

/// Engine selection, validated against the engine's capabilities at compile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_curve")]
    pub curve: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve: default_curve(),
            scheme: default_scheme(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.curve.trim().is_empty() {
            return Err(ConfigError::Invalid("curve cannot be empty".into()));
        }
        if self.scheme.trim().is_empty() {
            return Err(ConfigError::Invalid("scheme cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selection.validate()?;
        self.engine.validate()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), max = settings.selection.max, "loaded settings");
        Ok(settings)
    }
}
