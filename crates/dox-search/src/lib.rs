//! Full-text search indexing for rendered documentation sites.
//!
//! The pipeline discovers source documents under a content root, renders
//! each one to HTML through an injected [`Renderer`], splits the HTML
//! into heading-addressable sections, and folds everything into one
//! deterministic [`SearchIndex`] that is persisted as a single JSON
//! artifact. Unchanged documents are served from a build cache keyed by
//! content fingerprint, so warm rebuilds skip rendering entirely.
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//!
//! use dox_cache::{Cache, FileCache};
//! use dox_search::{IndexBuilder, RenderFailure, save_index};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = Arc::new(|path: &Path| -> Result<String, RenderFailure> {
//!     Ok(std::fs::read_to_string(path)?)
//! });
//! let cache: Arc<dyn Cache> = Arc::new(FileCache::new(PathBuf::from(".cache")));
//!
//! let builder = IndexBuilder::new(
//!     PathBuf::from("docs"),
//!     vec!["html".to_owned()],
//!     renderer,
//!     Arc::clone(&cache),
//! );
//! let index = builder.build()?;
//! save_index(Path::new("dist"), &index, &*cache)?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod document;
mod enumerate;
mod error;
mod index;
mod persist;
mod render;

pub use builder::{IndexBuilder, SEARCH_NAMESPACE};
pub use document::Document;
pub use enumerate::ContentEnumerator;
pub use error::{BuildError, PersistError};
pub use index::{IndexedSection, SearchHit, SearchIndex, section_id};
pub use persist::{INDEX_FILE, save_index};
pub use render::{RenderFailure, Renderer};
