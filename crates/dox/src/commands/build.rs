//! `dox build` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;

use dox_cache::{Cache, FileCache, NullCache};
use dox_renderer::MarkdownRenderer;
use dox_search::{INDEX_FILE, IndexBuilder, RenderFailure, Renderer, save_index};

use crate::config::{CliSettings, Config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Source document directory (overrides config).
    #[arg(short, long)]
    root_dir: Option<PathBuf>,

    /// Output directory for the index artifact (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,

    /// Path to configuration file (default: ./dox.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Markdown rendering behind the pipeline's renderer seam.
struct MarkdownSource {
    renderer: MarkdownRenderer,
}

impl Renderer for MarkdownSource {
    fn render(&self, path: &Path) -> Result<String, RenderFailure> {
        Ok(self.renderer.render_file(path)?)
    }
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            root_dir: self.root_dir,
            out_dir: self.out_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), &settings)?;

        output.info(&format!("Source: {}", config.root_dir.display()));
        output.info(&format!("Output: {}", config.out_dir.display()));

        let cache: Arc<dyn Cache> = if config.cache_enabled {
            Arc::new(FileCache::new(config.cache_dir.clone()))
        } else {
            Arc::new(NullCache)
        };

        let renderer = Arc::new(MarkdownSource {
            renderer: MarkdownRenderer::new(),
        });

        let mut builder = IndexBuilder::new(
            config.root_dir.clone(),
            config.extensions.clone(),
            renderer,
            Arc::clone(&cache),
        );
        if let Some(timeout) = config.render_timeout() {
            builder = builder.with_render_timeout(timeout);
        }

        let index = builder.build()?;
        save_index(&config.out_dir, &index, &*cache)?;

        output.success(&format!(
            "Indexed {} sections to {}",
            index.len(),
            config.out_dir.join(INDEX_FILE).display()
        ));
        Ok(())
    }
}
