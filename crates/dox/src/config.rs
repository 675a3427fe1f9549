//! `dox.toml` configuration loading.
//!
//! All settings are optional with sensible defaults. CLI flags are
//! applied on top of the loaded file via [`CliSettings`], so the
//! precedence is flags > file > defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dox.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub(crate) struct CliSettings {
    pub root_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub cache_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Directory of source documents.
    pub root_dir: PathBuf,
    /// Directory the index artifact is written to.
    pub out_dir: PathBuf,
    /// Build cache directory.
    pub cache_dir: PathBuf,
    /// Whether the build cache is used at all.
    pub cache_enabled: bool,
    /// Recognized source file extensions, without leading dots.
    pub extensions: Vec<String>,
    /// Per-document render timeout in seconds. Zero disables the bound.
    pub render_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("docs"),
            out_dir: PathBuf::from("dist"),
            cache_dir: PathBuf::from(".dox/cache"),
            cache_enabled: true,
            extensions: vec!["md".to_owned(), "mdx".to_owned()],
            render_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration, applying CLI overrides.
    ///
    /// With an explicit `path` the file must exist. Otherwise
    /// `./dox.toml` is used when present and defaults apply when it is
    /// not.
    pub(crate) fn load(
        path: Option<&Path>,
        settings: &CliSettings,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(root_dir) = &settings.root_dir {
            config.root_dir.clone_from(root_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            config.out_dir.clone_from(out_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            config.cache_enabled = cache_enabled;
        }
        Ok(config)
    }

    /// Render timeout as a duration, `None` when disabled.
    pub(crate) fn render_timeout(&self) -> Option<Duration> {
        (self.render_timeout_secs > 0).then(|| Duration::from_secs(self.render_timeout_secs))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
