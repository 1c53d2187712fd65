//! Error types for the artifacts context
//!
//! The context chain itself has no failure modes; these errors belong to the
//! capabilities it carries and to callers that opt into hard failure.

use std::path::PathBuf;

/// Raised by callers that treat a missing capability as fatal
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// No usable capability of this kind on the context
    #[error("capability not configured: {kind}")]
    Missing {
        /// Kind name
        kind: &'static str,
    },
}

/// Errors produced by [`ArtifactWriter`](crate::ArtifactWriter) implementations
#[derive(Debug, thiserror::Error)]
pub enum ArtifactWriteError {
    /// Artifact name cannot be mapped to a location
    #[error("invalid artifact name {name:?}: {reason}")]
    InvalidName {
        /// Name as given by the caller
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Storage backend failed
    #[error("failed to write artifact to {}: {source}", .path.display())]
    Io {
        /// Location being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactWriteError {
    /// Create an invalid-name error
    #[inline]
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Adapter for `map_err` that tags an I/O error with its path
    #[inline]
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
