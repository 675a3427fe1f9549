//! Content discovery by filesystem walking.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::document::Document;
use crate::error::BuildError;

/// Enumerates candidate source documents under a content root.
///
/// Enumeration is lazy and restartable: each [`documents`] call re-walks
/// the filesystem, so a second call reflects the current state. The walk
/// order is deterministic (lexicographic by path) so that downstream
/// cache keys and fixtures are reproducible within a run. Hidden files
/// are skipped; everything else is filtered purely by extension.
///
/// [`documents`]: ContentEnumerator::documents
pub struct ContentEnumerator {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ContentEnumerator {
    /// Create an enumerator over `root` recognizing the given file
    /// extensions (without leading dots, e.g. `["md", "mdx"]`).
    #[must_use]
    pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
        Self { root, extensions }
    }

    /// Content root this enumerator walks.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the content root, yielding documents in deterministic order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::RootNotFound`] if the root directory does
    /// not exist.
    pub fn documents(&self) -> Result<impl Iterator<Item = Document> + '_, BuildError> {
        if !self.root.is_dir() {
            return Err(BuildError::RootNotFound(self.root.clone()));
        }

        let walk = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .sort_by_file_path(Ord::cmp)
            .build();

        let iter = walk
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter(|entry| self.is_recognized(entry.path()))
            .map(|entry| Document::new(&self.root, entry.into_path()));

        Ok(iter)
    }

    /// Whether a path carries one of the recognized extensions.
    fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}
