//! Build cache abstraction for dox.
//!
//! The build pipeline uses a namespaced key-value cache to skip re-rendering
//! and re-splitting unchanged documents across runs. Two traits form the
//! core API:
//!
//! - [`Cache`]: Factory for named cache buckets (namespaces)
//! - [`CacheBucket`]: JSON key-value store within one namespace
//!
//! Cache faults are never fatal: a missing, unreadable, or malformed entry
//! is a miss, and failed writes are silently dropped. At worst the build
//! recomputes everything from a cold cache.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`FileCache`]: Disk-backed implementation, one JSON file per entry
//!
//! # Example
//!
//! ```
//! use dox_cache::{Cache, NullCache};
//! use serde_json::json;
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("search");
//! bucket.set("doc.abc123", &json!({"hello": "world"}));
//! assert_eq!(bucket.get("doc.abc123"), None); // NullCache always misses
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::{FileCache, clear};

use serde_json::Value;

/// A named partition within a [`Cache`].
///
/// Each bucket stores JSON payloads addressed by a string key. The empty
/// key addresses the namespace-wide entry. Invalidation is the caller's
/// concern: store whatever fingerprint is needed inside the payload and
/// compare on read.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached payload.
    ///
    /// Returns `None` on cache miss. A corrupt or unreadable entry is a
    /// miss, never an error.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key; the empty string addresses the namespace-wide entry
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a payload, overwriting any existing entry for the same key.
    ///
    /// Failures are logged and swallowed.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key; the empty string addresses the namespace-wide entry
    /// * `value` - JSON payload to cache
    fn set(&self, key: &str, value: &Value);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// Calling [`bucket`](Cache::bucket) multiple times with the same name may
/// return independent handles that share the same underlying storage.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// # Arguments
    ///
    /// * `name` - Bucket name (e.g., "search")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _value: &Value) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled. All operations are no-ops and all lookups
/// return `None`.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("search");

        // A fresh bucket has no data
        assert_eq!(bucket.get("key"), None);

        // Setting a value and reading it back still returns None
        bucket.set("key", &json!("hello"));
        assert_eq!(bucket.get("key"), None);
    }

    #[test]
    fn test_null_cache_different_buckets_all_miss() {
        let cache = NullCache;

        for name in &["search", "twoslash", "assets"] {
            let bucket = cache.bucket(name);
            bucket.set("k", &json!(1));
            assert_eq!(bucket.get("k"), None, "bucket {name} should miss");
        }
    }
}
