//! Typed capability bundle
//!
//! [`Capabilities`] holds one optional field per capability. It is the
//! statically typed counterpart of the context chain: snapshot it from a
//! context at an entry point, pass it explicitly, or push it back onto a
//! context.

use crate::context::Context;
use crate::error::CapabilityError;
use crate::key::CapabilityKind;
use crate::logger::{Logger, LoggerKind};
use crate::writer::{ArtifactWriterKind, SharedWriter};
use std::fmt::{self, Debug, Formatter};

/// Explicit set of capabilities
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Artifact writer, if configured
    pub writer: Option<SharedWriter>,
    /// Logger, if configured
    pub logger: Option<Logger>,
}

impl Capabilities {
    /// Bundle with nothing configured
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With artifact writer
    #[inline]
    #[must_use]
    pub fn with_writer(mut self, writer: SharedWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// With logger
    #[inline]
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Snapshot every capability visible from `ctx`
    #[must_use]
    pub fn from_context(ctx: &Context) -> Self {
        Self {
            writer: ctx.retrieve::<ArtifactWriterKind>().cloned(),
            logger: ctx.retrieve::<LoggerKind>().cloned(),
        }
    }

    /// Derive a context from `ctx` with every configured capability attached
    ///
    /// Absent fields attach nothing, so they never hide a capability `ctx`
    /// already carries.
    #[must_use]
    pub fn into_context(self, ctx: &Context) -> Context {
        let mut derived = ctx.clone();
        if let Some(writer) = self.writer {
            derived = derived.attach::<ArtifactWriterKind>(writer);
        }
        if let Some(logger) = self.logger {
            derived = derived.attach::<LoggerKind>(logger);
        }
        derived
    }

    /// Artifact writer, treating absence as an error
    ///
    /// # Errors
    /// Returns [`CapabilityError::Missing`] if no writer is configured
    pub fn require_writer(&self) -> Result<&SharedWriter, CapabilityError> {
        self.writer.as_ref().ok_or_else(missing::<ArtifactWriterKind>)
    }

    /// Logger, treating absence as an error
    ///
    /// # Errors
    /// Returns [`CapabilityError::Missing`] if no logger is configured
    pub fn require_logger(&self) -> Result<&Logger, CapabilityError> {
        self.logger.as_ref().ok_or_else(missing::<LoggerKind>)
    }
}

fn missing<K: CapabilityKind>() -> CapabilityError {
    CapabilityError::Missing { kind: K::NAME }
}

impl Debug for Capabilities {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("writer", &self.writer.is_some())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
