//! Artifact writer capability

use crate::context::Context;
use crate::error::ArtifactWriteError;
use crate::key::CapabilityKind;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Stores named byte streams somewhere and reports where they landed
///
/// Implementations own every storage decision (backend, directory layout,
/// overwrite policy). They are shared across threads through
/// [`SharedWriter`], so any internal state needs its own synchronization.
pub trait ArtifactWriter: Send + Sync {
    /// Write `contents` as artifact `name`, returning its resolved location
    ///
    /// # Errors
    /// Returns error if `name` is rejected or the backend fails
    fn write_file(&self, name: &str, contents: &mut dyn Read)
        -> Result<PathBuf, ArtifactWriteError>;
}

impl<W: ArtifactWriter + ?Sized> ArtifactWriter for Arc<W> {
    fn write_file(
        &self,
        name: &str,
        contents: &mut dyn Read,
    ) -> Result<PathBuf, ArtifactWriteError> {
        (**self).write_file(name, contents)
    }
}

/// Shared handle to an artifact writer
pub type SharedWriter = Arc<dyn ArtifactWriter>;

/// Capability kind for the artifact writer
#[derive(Debug, Clone, Copy)]
pub struct ArtifactWriterKind;

impl CapabilityKind for ArtifactWriterKind {
    type Value = SharedWriter;
    const NAME: &'static str = "artifact-writer";
}

/// Derive a context carrying `writer`
#[inline]
#[must_use]
pub fn with_writer(ctx: &Context, writer: SharedWriter) -> Context {
    ctx.attach::<ArtifactWriterKind>(writer)
}

/// Artifact writer on `ctx`, or `None` if none is configured
#[inline]
#[must_use]
pub fn writer_from(ctx: &Context) -> Option<SharedWriter> {
    ctx.retrieve::<ArtifactWriterKind>().cloned()
}
