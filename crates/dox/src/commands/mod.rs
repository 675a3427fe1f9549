//! CLI command implementations.

mod build;
mod clear_cache;

pub(crate) use build::BuildArgs;
pub(crate) use clear_cache::ClearCacheArgs;
