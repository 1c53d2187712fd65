//! Store configuration
//!
//! The artifacts directory is an explicit value handed to each writer at
//! construction time. There is no process-wide directory to change or reset.

use crate::logging::LoggingConfig;
use artifacts_context::ArtifactWriteError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Directory used when nothing else is configured
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Environment variable overriding the artifacts directory
pub const ARTIFACTS_DIR_ENV: &str = "ARTIFACTS_DIR";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a config
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Log filter directive is malformed
    #[error("invalid log filter {filter:?}: {source}")]
    InvalidFilter {
        /// Directive as given
        filter: String,
        /// Parser error
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// Unknown log format name
    #[error("unknown log format: {0}")]
    InvalidFormat(String),
}

/// Where and how artifacts are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Root directory for artifacts
    pub dir: PathBuf,
    /// Create missing directories on write
    pub create_dirs: bool,
}

impl ArtifactsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With artifacts directory
    #[inline]
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// With directory creation on write
    #[inline]
    #[must_use]
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    /// Default configuration with `ARTIFACTS_DIR` applied
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration with overrides read through `lookup`
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ARTIFACTS_DIR_ENV).filter(|d| !d.is_empty()) {
            config.dir = PathBuf::from(dir);
        }
        config
    }

    /// Location of artifact `name` under the artifacts directory
    ///
    /// `name` may contain subdirectories but must stay inside the
    /// artifacts directory.
    ///
    /// # Errors
    /// Returns [`ArtifactWriteError::InvalidName`] for empty names, absolute
    /// paths and `..` components
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ArtifactWriteError> {
        let mut resolved = self.dir.clone();
        let mut pushed = false;

        for component in Path::new(name).components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(ArtifactWriteError::invalid_name(
                        name,
                        "parent directory component",
                    ))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ArtifactWriteError::invalid_name(name, "absolute path"))
                }
            }
        }

        if pushed {
            Ok(resolved)
        } else {
            Err(ArtifactWriteError::invalid_name(name, "empty file name"))
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            create_dirs: true,
        }
    }
}

/// Complete store configuration, as loaded from a TOML file
///
/// ```toml
/// [artifacts]
/// dir = "target/artifacts"
/// create_dirs = true
///
/// [logging]
/// filter = "artifacts_store=debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Artifact writer settings
    pub artifacts: ArtifactsConfig,
    /// Logger settings
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Parse from TOML; missing sections and fields take defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}
