//! Filesystem artifact writer

use crate::config::ArtifactsConfig;
use artifacts_context::{ArtifactWriteError, ArtifactWriter};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes artifacts as files under the configured directory
///
/// Contents are staged in a temporary file and renamed over the target, so a
/// failed write leaves any earlier artifact of the same name intact.
/// Concurrent writes to the same name race; the last rename wins.
#[derive(Debug, Clone)]
pub struct DirArtifactWriter {
    config: ArtifactsConfig,
}

impl DirArtifactWriter {
    /// Create writer from configuration
    #[inline]
    #[must_use]
    pub fn new(config: ArtifactsConfig) -> Self {
        Self { config }
    }

    /// Writer rooted at `dir`, creating directories on demand
    #[inline]
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactsConfig::new().with_dir(dir))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ArtifactsConfig {
        &self.config
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), ArtifactWriteError> {
        if !self.config.create_dirs {
            return Ok(());
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(ArtifactWriteError::io(parent))
            }
            _ => Ok(()),
        }
    }
}

impl Default for DirArtifactWriter {
    fn default() -> Self {
        Self::new(ArtifactsConfig::default())
    }
}

impl ArtifactWriter for DirArtifactWriter {
    fn write_file(
        &self,
        name: &str,
        contents: &mut dyn Read,
    ) -> Result<PathBuf, ArtifactWriteError> {
        let path = self.config.resolve(name)?;
        self.ensure_parent(&path)?;

        // Stage next to the target so the final rename stays on one filesystem.
        let staging_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged =
            NamedTempFile::new_in(staging_dir).map_err(ArtifactWriteError::io(staging_dir))?;

        let bytes = {
            let mut out = BufWriter::new(&mut staged);
            io::copy(contents, &mut out)
                .and_then(|n| out.flush().map(|()| n))
                .map_err(ArtifactWriteError::io(&path))?
        };

        staged
            .persist(&path)
            .map_err(|err| ArtifactWriteError::io(&path)(err.error))?;

        debug!(artifact = name, path = %path.display(), bytes, "artifact written");
        Ok(path)
    }
}
