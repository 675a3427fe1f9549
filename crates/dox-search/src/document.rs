//! Source documents and their stable identifiers.

use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

/// One source content file discovered under the content root.
///
/// Immutable for the duration of one build. The id is derived
/// deterministically from the path relative to the root, so it is stable
/// across runs and across machines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Stable identifier, e.g. `/guide` or `/domain/setup`.
    pub id: String,
    /// Absolute path of the source file.
    pub path: PathBuf,
}

impl Document {
    /// Create a document for `path` under `root`.
    pub(crate) fn new(root: &Path, path: PathBuf) -> Self {
        let id = doc_id(path.strip_prefix(root).unwrap_or(&path));
        Self { id, path }
    }
}

/// Derive a document id from a root-relative path.
///
/// The extension is stripped and `index` files collapse to their
/// directory:
///
/// - `index.md` -> `/`
/// - `guide.md` -> `/guide`
/// - `domain/index.md` -> `/domain`
/// - `domain/setup.md` -> `/domain/setup`
pub(crate) fn doc_id(rel: &Path) -> String {
    let without_ext = rel.with_extension("");
    let joined = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let part = if joined == "index" {
        ""
    } else {
        joined.strip_suffix("/index").unwrap_or(&joined)
    };

    format!("/{part}")
}

/// Content fingerprint: SHA-256 hex over raw file bytes.
///
/// Content hashing (rather than mtime) keeps cache keys reproducible
/// across filesystems and cache directory copies.
pub(crate) fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Short cache key for a document identity.
pub(crate) fn cache_key(doc_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(doc_id.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("doc.{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_root_index() {
        assert_eq!(doc_id(Path::new("index.md")), "/");
    }

    #[test]
    fn test_doc_id_top_level_file() {
        assert_eq!(doc_id(Path::new("guide.md")), "/guide");
    }

    #[test]
    fn test_doc_id_nested_index() {
        assert_eq!(doc_id(Path::new("domain/index.md")), "/domain");
    }

    #[test]
    fn test_doc_id_nested_file() {
        assert_eq!(doc_id(Path::new("domain/setup.md")), "/domain/setup");
    }

    #[test]
    fn test_doc_id_ignores_extension() {
        assert_eq!(doc_id(Path::new("guide.mdx")), "/guide");
        assert_eq!(doc_id(Path::new("guide.markdown")), "/guide");
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash(b"hello"), content_hash(b"hello"));
        assert_ne!(content_hash(b"hello"), content_hash(b"hello!"));
    }

    #[test]
    fn test_cache_key_format() {
        let key = cache_key("/guide");
        assert!(key.starts_with("doc."));
        assert_eq!(key.len(), "doc.".len() + 16);
        assert_eq!(key, cache_key("/guide"));
        assert_ne!(key, cache_key("/other"));
    }

    #[test]
    fn test_document_new_strips_root() {
        let root = Path::new("/content");
        let doc = Document::new(root, PathBuf::from("/content/a/b.md"));
        assert_eq!(doc.id, "/a/b");
        assert_eq!(doc.path, PathBuf::from("/content/a/b.md"));
    }
}
