//! Index persistence.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use dox_cache::Cache;

use crate::builder::SEARCH_NAMESPACE;
use crate::error::PersistError;
use crate::index::SearchIndex;

/// File name of the persisted index inside the output directory.
pub const INDEX_FILE: &str = "search-index.json";

/// Cache key under which the artifact fingerprint is recorded.
const FINGERPRINT_KEY: &str = "index-fingerprint";

/// Write the index to `{out_dir}/search-index.json`.
///
/// The artifact is written through a temporary file and renamed into
/// place, so readers never observe a half-written index. A short
/// fingerprint of the serialized bytes is recorded in the cache for
/// change detection by downstream tooling.
///
/// # Errors
///
/// Returns [`PersistError`] if serialization or any filesystem step
/// fails. Fingerprint recording shares the cache's failure mode and never
/// fails the save.
pub fn save_index(
    out_dir: &Path,
    index: &SearchIndex,
    cache: &dyn Cache,
) -> Result<(), PersistError> {
    let bytes = serde_json::to_vec(index)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(INDEX_FILE);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, &path)?;

    let fingerprint = artifact_fingerprint(&bytes);
    cache
        .bucket(SEARCH_NAMESPACE)
        .set(FINGERPRINT_KEY, &serde_json::Value::String(fingerprint));

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        sections = index.len(),
        "search index written"
    );
    Ok(())
}

/// Short hex fingerprint of the serialized artifact.
fn artifact_fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_owned()
}
