//! Logger construction
//!
//! Builds [`Logger`] capabilities from configuration. The resulting dispatch
//! is never installed globally; callers attach it to a context or scope it
//! with [`Logger::in_scope`].

use crate::config::ConfigError;
use artifacts_context::Logger;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "ARTIFACTS_LOG_FORMAT";

/// Output format for log records
///
/// Config files and `ARTIFACTS_LOG_FORMAT` accept the same names, parsed by
/// [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per record
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Logger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info,artifacts_store=debug`
    pub filter: String,
    /// Record format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With filter directives
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// With record format
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Default configuration with `RUST_LOG` and `ARTIFACTS_LOG_FORMAT` applied
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFormat`] for an unknown format name
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration with overrides read through `lookup`
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFormat`] for an unknown format name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(filter) = lookup(EnvFilter::DEFAULT_ENV).filter(|f| !f.is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV).filter(|f| !f.is_empty()) {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    /// Build a logger writing to stderr
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFilter`] if the filter does not parse
    pub fn build_logger(&self) -> Result<Logger, ConfigError> {
        self.build_logger_with_writer(std::io::stderr)
    }

    /// Build a logger writing through `writer`
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFilter`] if the filter does not parse
    pub fn build_logger_with_writer<W>(&self, writer: W) -> Result<Logger, ConfigError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter =
            EnvFilter::try_new(&self.filter).map_err(|source| ConfigError::InvalidFilter {
                filter: self.filter.clone(),
                source,
            })?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false);

        let logger = match self.format {
            LogFormat::Pretty => Logger::from_subscriber(builder.finish()),
            LogFormat::Json => Logger::from_subscriber(builder.json().finish()),
        };
        Ok(logger)
    }
}
