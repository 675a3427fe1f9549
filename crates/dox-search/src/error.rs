//! Error types for the search build pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Error building the search index.
///
/// A build either completes for every document or fails as a whole: a
/// partial index is never produced, so none of these variants are
/// recoverable mid-build. Cache faults are not represented here; they
/// degrade to cache misses inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Content root directory does not exist.
    #[error("Content root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Source file could not be read.
    #[error("Failed to read {id}: {source}")]
    Read {
        /// Document id of the unreadable source.
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// External renderer failed for a document.
    #[error("Failed to render {id}: {message}")]
    Render {
        /// Document id of the failing source.
        id: String,
        /// Renderer-reported failure.
        message: String,
    },

    /// External renderer exceeded the per-document time budget.
    #[error("Rendering {id} timed out after {timeout:?}")]
    RenderTimeout {
        /// Document id of the timed-out source.
        id: String,
        /// Configured per-document timeout.
        timeout: Duration,
    },
}

/// Error persisting the built index to the output directory.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Index could not be serialized.
    #[error("Failed to serialize search index: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Artifact could not be written.
    #[error("Failed to write search index: {0}")]
    Io(#[from] std::io::Error),
}
