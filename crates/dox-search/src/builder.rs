//! Index construction pipeline.
//!
//! [`IndexBuilder`] orchestrates enumeration, rendering, section
//! splitting, and the build cache into one in-memory [`SearchIndex`].
//! Documents fan out across a rayon thread pool (each document's
//! render/split/cache-populate path touches only its own cache key) and
//! the index itself is accumulated in a single sequential pass afterward,
//! so "add document" calls never race.
//!
//! The build fails as a whole if any document fails to render: a search
//! index that silently omits content is worse than no index.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use dox_cache::{Cache, CacheBucket, CacheBucketExt};
use dox_sections::{Section, split_page};

use crate::document::{Document, cache_key, content_hash};
use crate::enumerate::ContentEnumerator;
use crate::error::BuildError;
use crate::index::SearchIndex;
use crate::render::Renderer;

/// Cache namespace holding per-document artifacts and the index
/// fingerprint.
pub const SEARCH_NAMESPACE: &str = "search";

/// Per-document cache payload: the fingerprint of the source content the
/// sections were derived from, plus the sections themselves.
#[derive(Serialize, Deserialize)]
struct CachedDocument {
    fingerprint: String,
    sections: Vec<Section>,
}

/// Builds a [`SearchIndex`] over a content root.
///
/// The renderer is an injected capability and the cache client is scoped
/// to this builder; there is no ambient global state, so two builders
/// with different cache directories are fully independent.
pub struct IndexBuilder {
    enumerator: ContentEnumerator,
    renderer: Arc<dyn Renderer>,
    cache: Arc<dyn Cache>,
    render_timeout: Option<Duration>,
}

impl IndexBuilder {
    /// Create a builder over `root` for files with the given extensions.
    ///
    /// Pass [`dox_cache::NullCache`] to disable caching.
    #[must_use]
    pub fn new(
        root: PathBuf,
        extensions: Vec<String>,
        renderer: Arc<dyn Renderer>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            enumerator: ContentEnumerator::new(root, extensions),
            renderer,
            cache,
            render_timeout: None,
        }
    }

    /// Bound each document's render call to `timeout`.
    ///
    /// A document exceeding the budget fails the build with
    /// [`BuildError::RenderTimeout`].
    #[must_use]
    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = Some(timeout);
        self
    }

    /// Build the search index over all documents under the root.
    ///
    /// Unchanged documents (same content fingerprint as the cached entry)
    /// are served from the cache without invoking the renderer. The
    /// resulting index is deterministic regardless of worker scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::RootNotFound`] if the content root is
    /// missing, and [`BuildError::Read`], [`BuildError::Render`], or
    /// [`BuildError::RenderTimeout`] for the first failing document. No
    /// partial index is ever returned.
    pub fn build(&self) -> Result<SearchIndex, BuildError> {
        let documents: Vec<Document> = self.enumerator.documents()?.collect();
        let bucket = self.cache.bucket(SEARCH_NAMESPACE);

        let per_document: Vec<(String, Vec<Section>)> = documents
            .into_par_iter()
            .map(|doc| self.process_document(doc, &*bucket))
            .collect::<Result<_, _>>()?;

        let mut index = SearchIndex::new();
        let mut section_count = 0;
        for (doc_id, sections) in &per_document {
            section_count += sections.len();
            index.add_document(doc_id, sections);
        }

        tracing::info!(
            documents = per_document.len(),
            sections = section_count,
            "search index built"
        );
        Ok(index)
    }

    /// Produce the sections of one document, from cache when possible.
    fn process_document(
        &self,
        doc: Document,
        bucket: &dyn CacheBucket,
    ) -> Result<(String, Vec<Section>), BuildError> {
        let content = fs::read(&doc.path).map_err(|source| BuildError::Read {
            id: doc.id.clone(),
            source,
        })?;
        let fingerprint = content_hash(&content);
        let key = cache_key(&doc.id);

        if let Some(cached) = bucket.get_json::<CachedDocument>(&key)
            && cached.fingerprint == fingerprint
        {
            tracing::debug!(id = %doc.id, "cache hit");
            return Ok((doc.id, cached.sections));
        }

        tracing::debug!(id = %doc.id, "cache miss, rendering");
        let html = self.render_document(&doc)?;
        let sections = split_page(&html);

        bucket.set_json(
            &key,
            &CachedDocument {
                fingerprint,
                sections: sections.clone(),
            },
        );

        Ok((doc.id, sections))
    }

    /// Invoke the renderer, bounded by the configured timeout.
    fn render_document(&self, doc: &Document) -> Result<String, BuildError> {
        let Some(timeout) = self.render_timeout else {
            return self
                .renderer
                .render(&doc.path)
                .map_err(|e| BuildError::Render {
                    id: doc.id.clone(),
                    message: e.to_string(),
                });
        };

        // Run the render on a helper thread so the wait can be bounded.
        // A timed-out render is abandoned; its eventual result is dropped
        // with the channel.
        let (tx, rx) = mpsc::channel();
        let renderer = Arc::clone(&self.renderer);
        let path = doc.path.clone();
        thread::spawn(move || {
            let _ = tx.send(renderer.render(&path));
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(html)) => Ok(html),
            Ok(Err(e)) => Err(BuildError::Render {
                id: doc.id.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(BuildError::RenderTimeout {
                id: doc.id.clone(),
                timeout,
            }),
        }
    }
}
