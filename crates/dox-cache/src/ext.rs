//! Extension trait for [`CacheBucket`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Implemented as default methods on an extension trait so that:
///
/// - [`CacheBucket`] stays object-safe
/// - Implementors only need to handle raw JSON payloads
/// - Callers get ergonomic typed access via a blanket impl
///
/// # Example
///
/// ```
/// use dox_cache::{Cache, CacheBucketExt, NullCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct CachedDocument { fingerprint: String }
///
/// let cache = NullCache;
/// let bucket = cache.bucket("search");
///
/// bucket.set_json("doc", &CachedDocument { fingerprint: "f00".into() });
/// let data: Option<CachedDocument> = bucket.get_json("doc");
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a deserialized value from the cache.
    ///
    /// Returns `None` on cache miss or deserialization failure.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).ok()
    }

    /// Store a serializable value in the cache.
    ///
    /// Silently does nothing if serialization fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.set(key, &json);
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
