//! The external renderer capability.

use std::error::Error;
use std::path::Path;

/// Boxed renderer failure, opaque to the pipeline.
pub type RenderFailure = Box<dyn Error + Send + Sync>;

/// Capability that turns a source document into an HTML fragment.
///
/// The build pipeline treats rendering as an external concern: it depends
/// only on this trait's output shape, never on a specific rendering
/// engine. Implementations must be shareable across worker threads.
pub trait Renderer: Send + Sync {
    /// Render the document at `path` to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole build, tagged with the document id by
    /// the caller.
    fn render(&self, path: &Path) -> Result<String, RenderFailure>;
}

/// Closures can serve as renderers in tests and simple embeddings.
impl<F> Renderer for F
where
    F: Fn(&Path) -> Result<String, RenderFailure> + Send + Sync,
{
    fn render(&self, path: &Path) -> Result<String, RenderFailure> {
        self(path)
    }
}
