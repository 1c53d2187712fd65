//! Artifacts Store
//!
//! Concrete capabilities for [`artifacts_context`]: artifact writers backed
//! by the filesystem or memory, their configuration, and logger
//! construction.
//!
//! # Example
//!
//! ```rust,ignore
//! use artifacts_context::{with_logger, with_writer, Context};
//! use artifacts_store::{DirArtifactWriter, StoreConfig};
//! use std::sync::Arc;
//!
//! let config = StoreConfig::from_toml_str(&std::fs::read_to_string("artifacts.toml")?)?;
//! let writer = Arc::new(DirArtifactWriter::new(config.artifacts.clone()));
//! let logger = config.logging.build_logger()?;
//!
//! let ctx = with_logger(&with_writer(&Context::new(), writer), logger);
//! ```

#![warn(unreachable_pub)]

mod config;
mod dir;
mod logging;
mod memory;

pub use config::{
    ArtifactsConfig, ConfigError, StoreConfig, ARTIFACTS_DIR_ENV, DEFAULT_ARTIFACTS_DIR,
};
pub use dir::DirArtifactWriter;
pub use logging::{LogFormat, LoggingConfig, LOG_FORMAT_ENV};
pub use memory::MemoryArtifactWriter;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
