//! CLI error types.

use dox_search::{BuildError, PersistError};

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Persist(#[from] PersistError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
