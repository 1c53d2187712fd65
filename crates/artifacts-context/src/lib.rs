//! Artifacts Context
//!
//! Request-scoped propagation of cross-cutting capabilities through an
//! immutable context chain.
//!
//! # Core Concepts
//!
//! - [`Context`]: Immutable, cheaply cloned chain of attachments
//! - [`CapabilityKind`]: Marker trait naming a capability slot and its value type
//! - [`CapabilityKey`]: Opaque per-kind token the chain is keyed by
//! - [`ArtifactWriter`]: Capability that stores named byte streams
//! - [`Logger`]: Capability wrapping a `tracing` dispatch
//! - [`Capabilities`]: Typed bundle with one field per capability
//!
//! # Example
//!
//! ```rust,ignore
//! use artifacts_context::{logger_from, with_writer, writer_from, Context};
//!
//! let ctx = with_writer(&Context::new(), writer);
//!
//! // ...anywhere downstream
//! if let Some(writer) = writer_from(&ctx) {
//!     let path = writer.write_file("report.json", &mut body)?;
//! }
//! assert!(logger_from(&ctx).is_none());
//! ```

#![warn(unreachable_pub)]

mod bundle;
mod context;
mod error;
mod key;
mod logger;
mod writer;

pub use bundle::Capabilities;
pub use context::{Context, ErasedValue};
pub use error::{ArtifactWriteError, CapabilityError};
pub use key::{CapabilityKey, CapabilityKind};
pub use logger::{logger_from, with_logger, Logger, LoggerKind};
pub use writer::{with_writer, writer_from, ArtifactWriter, ArtifactWriterKind, SharedWriter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
