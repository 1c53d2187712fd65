//! In-memory artifact writer

use crate::config::ArtifactsConfig;
use artifacts_context::{ArtifactWriteError, ArtifactWriter};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Keeps artifacts in memory, keyed by their resolved path
///
/// Paths are resolved with the same rules as
/// [`DirArtifactWriter`](crate::DirArtifactWriter) but nothing touches disk.
/// A later write to the same name replaces the earlier one.
#[derive(Debug, Default)]
pub struct MemoryArtifactWriter {
    config: ArtifactsConfig,
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryArtifactWriter {
    /// Create writer using `config` for path resolution
    #[inline]
    #[must_use]
    pub fn new(config: ArtifactsConfig) -> Self {
        Self {
            config,
            files: RwLock::default(),
        }
    }

    /// Contents of artifact `name`, if written
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.config.resolve(name).ok()?;
        self.read(&path)
    }

    /// Contents at an already resolved path, if written
    #[must_use]
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).cloned()
    }

    /// Resolved paths of all artifacts, sorted
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }

    /// Number of stored artifacts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Check if nothing has been written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl ArtifactWriter for MemoryArtifactWriter {
    fn write_file(
        &self,
        name: &str,
        contents: &mut dyn Read,
    ) -> Result<PathBuf, ArtifactWriteError> {
        let path = self.config.resolve(name)?;

        // Drain the reader before taking the lock.
        let mut data = Vec::new();
        contents
            .read_to_end(&mut data)
            .map_err(ArtifactWriteError::io(&path))?;

        trace!(artifact = name, bytes = data.len(), "artifact stored in memory");
        self.files.write().insert(path.clone(), data);
        Ok(path)
    }
}
