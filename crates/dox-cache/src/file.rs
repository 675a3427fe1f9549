//! Disk-backed cache implementation.
//!
//! [`FileCache`] stores one JSON file per entry directly under the cache
//! directory:
//!
//! ```text
//! {cache_dir}/{namespace}.json          # namespace-wide entry (empty key)
//! {cache_dir}/{namespace}.{key}.json    # keyed entry
//! ```
//!
//! Each file holds an envelope object `{"value": <payload>}`. Writes go
//! through a temporary file followed by a rename, so a crash mid-write
//! leaves either the old entry or an unparsable temp file; a later read
//! degrades to a miss instead of returning torn data.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Cache, CacheBucket};

/// On-disk entry envelope.
#[derive(Serialize, Deserialize)]
struct Envelope {
    value: Value,
}

/// Disk-backed [`Cache`] rooted at a directory.
///
/// The directory is created lazily on first write, so constructing a
/// `FileCache` for a directory that never receives a `set` leaves the
/// filesystem untouched.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache client rooted at `dir`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.dir.clone(),
            namespace: name.to_owned(),
        })
    }
}

/// A single namespace backed by JSON files on disk.
struct FileCacheBucket {
    dir: PathBuf,
    namespace: String,
}

impl FileCacheBucket {
    /// Path of the entry file for `key`.
    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name = if key.is_empty() {
            format!("{}.json", self.namespace)
        } else {
            format!("{}.{key}.json", self.namespace)
        };
        self.dir.join(file_name)
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let contents = fs::read_to_string(&path).ok()?;

        // Malformed JSON is a miss, not an error. The cache is always
        // allowed to be cold.
        match serde_json::from_str::<Envelope>(&contents) {
            Ok(envelope) => Some(envelope.value),
            Err(e) => {
                tracing::debug!("discarding unparsable cache entry {}: {e}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &Value) {
        if let Err(e) = self.try_set(key, value) {
            tracing::warn!(
                "failed to write cache entry {}.{key}: {e}",
                self.namespace
            );
        }
    }
}

impl FileCacheBucket {
    fn try_set(&self, key: &str, value: &Value) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let envelope = Envelope {
            value: value.clone(),
        };
        let json = serde_json::to_vec(&envelope)?;

        // Temp file + rename keeps the visible entry parseable at all times
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Remove the entire cache directory.
///
/// A nonexistent directory is not an error: clearing an already-cold
/// cache is a no-op.
///
/// # Errors
///
/// Returns any I/O error other than the directory being absent.
pub fn clear(cache_dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(cache_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"));
        let bucket = cache.bucket("search");

        bucket.set("doc.abc", &json!({"fingerprint": "f00", "sections": []}));
        let value = bucket.get("doc.abc").unwrap();
        assert_eq!(value["fingerprint"], "f00");
    }

    #[test]
    fn test_get_missing_key() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"));
        let bucket = cache.bucket("search");

        assert_eq!(bucket.get("never-set"), None);
    }

    #[test]
    fn test_empty_key_addresses_namespace_entry() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        bucket.set("", &json!("namespace-wide"));

        assert_eq!(bucket.get(""), Some(json!("namespace-wide")));
        assert!(tmp.path().join("search.json").is_file());
    }

    #[test]
    fn test_keyed_entry_file_layout() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        bucket.set("doc.abc", &json!(1));

        // {cache_dir}/{namespace}.{key}.json with the {"value": ...} envelope
        let raw = fs::read_to_string(tmp.path().join("search.doc.abc.json")).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, json!({"value": 1}));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("search.doc.json"), "{ not json").unwrap();

        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        assert_eq!(bucket.get("doc"), None);
    }

    #[test]
    fn test_entry_without_envelope_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        // Valid JSON but missing the {"value": ...} envelope
        fs::write(tmp.path().join("search.doc.json"), r#"{"other": 1}"#).unwrap();

        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        assert_eq!(bucket.get("doc"), None);
    }

    #[test]
    fn test_overwrite() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        bucket.set("key", &json!("first"));
        bucket.set("key", &json!("second"));

        assert_eq!(bucket.get("key"), Some(json!("second")));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf());

        let search = cache.bucket("search");
        let twoslash = cache.bucket("twoslash");

        search.set("key", &json!("search-data"));
        twoslash.set("key", &json!("twoslash-data"));

        assert_eq!(search.get("key"), Some(json!("search-data")));
        assert_eq!(twoslash.get("key"), Some(json!("twoslash-data")));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf());
        let bucket = cache.bucket("search");

        let value = json!({
            "nested": {"array": [1, 2, 3], "null": null},
            "text": "héllo wörld",
        });
        bucket.set("deep", &value);

        assert_eq!(bucket.get("deep"), Some(value));
    }

    #[test]
    fn test_set_creates_cache_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("deeply/nested/cache");
        let cache = FileCache::new(dir.clone());

        assert!(!dir.exists());
        cache.bucket("search").set("key", &json!(true));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_clear_removes_all_entries() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cache");
        let cache = FileCache::new(dir.clone());
        let bucket = cache.bucket("search");

        bucket.set("a", &json!(1));
        bucket.set("b", &json!(2));

        clear(&dir).unwrap();

        assert_eq!(bucket.get("a"), None);
        assert_eq!(bucket.get("b"), None);
        assert!(!dir.exists());
    }

    #[test]
    fn test_clear_nonexistent_dir_is_noop() {
        let tmp = TempDir::new().unwrap();
        clear(&tmp.path().join("never-created")).unwrap();
    }
}
