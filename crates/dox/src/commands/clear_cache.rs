//! `dox clear-cache` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::{CliSettings, Config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clear-cache command.
#[derive(Args)]
pub(crate) struct ClearCacheArgs {
    /// Path to configuration file (default: ./dox.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ClearCacheArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), &CliSettings::default())?;
        dox_cache::clear(&config.cache_dir)?;

        output.success(&format!(
            "Cache cleared: {}",
            config.cache_dir.display()
        ));
        Ok(())
    }
}
