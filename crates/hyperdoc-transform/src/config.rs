//! Transformer configuration, loadable from TOML or YAML.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`TransformConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config format: {0} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Knobs for [`Transformer`](crate::Transformer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Object members never emitted as children. Mapping keys are not
    /// affected.
    pub excluded_members: BTreeSet<String>,
    /// Maximum container nesting below the root.
    pub max_depth: usize,
    /// Fail on shared allocations that reach one of their own ancestors.
    pub detect_cycles: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            excluded_members: ["id", "links"].into_iter().map(String::from).collect(),
            max_depth: 128,
            detect_cycles: true,
        }
    }
}

impl TransformConfig {
    /// Load from a `.toml`, `.yaml` or `.yml` file. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, has an unknown
    /// extension, or fails to parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        };
        match format.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?),
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input or unknown keys.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed input or unknown keys.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    #[must_use]
    pub fn is_excluded(&self, member: &str) -> bool {
        self.excluded_members.contains(member)
    }
}
