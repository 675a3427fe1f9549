//! Markdown-to-HTML rendering with anchored headings.
//!
//! [`MarkdownRenderer`] wraps pulldown-cmark with one addition the search
//! pipeline depends on: every heading receives an `id` attribute, derived
//! from its inner text and deduplicated with `-1`, `-2`… suffixes. Explicit
//! ids from heading attributes (`## Title {#custom}`) are kept as-is but
//! still participate in deduplication.

mod slug;

pub use slug::slugify;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Markdown renderer with GFM enabled by default.
#[derive(Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports tables, strikethrough
    /// (`~~text~~`), and task lists (`- [ ] item`).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    ///
    /// Heading attributes are always enabled so that explicit anchors
    /// (`{#custom}`) survive rendering.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_HEADING_ATTRIBUTES;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            base
        }
    }

    /// Render a markdown string to an HTML fragment.
    #[must_use]
    pub fn render_str(&self, markdown: &str) -> String {
        let events = assign_heading_ids(Parser::new_ext(markdown, self.parser_options()));

        let mut out = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut out, events.into_iter());
        out
    }

    /// Read and render a markdown file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn render_file(&self, path: &Path) -> io::Result<String> {
        let markdown = fs::read_to_string(path)?;
        Ok(self.render_str(&markdown))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite heading start tags so every heading carries a unique id.
fn assign_heading_ids<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = parser.collect();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for i in 0..events.len() {
        let Event::Start(Tag::Heading { id, .. }) = &events[i] else {
            continue;
        };

        let unique = match id {
            Some(explicit) => dedupe(explicit, &mut seen),
            None => dedupe(&slugify(&heading_text(&events[i..])), &mut seen),
        };

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(unique));
        }
    }

    events
}

/// Collect the plain text of a heading from its inner events.
///
/// `events` starts at the heading's `Start` tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in &events[1..] {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Deduplicate a slug with `-1`, `-2`… suffixes.
fn dedupe(slug: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(slug.to_owned()).or_insert(0);
    let unique = if *count == 0 {
        slug.to_owned()
    } else {
        format!("{slug}-{count}")
    };
    *count += 1;
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render_str(markdown)
    }

    #[test]
    fn test_heading_gets_id() {
        let html = render("## Getting Started");
        assert!(html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let html = render("## FAQ\n\n## FAQ\n\n## FAQ");
        assert!(html.contains(r#"id="faq""#));
        assert!(html.contains(r#"id="faq-1""#));
        assert!(html.contains(r#"id="faq-2""#));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let html = render("## Install `npm`");
        assert!(html.contains(r#"id="install-npm""#));
        assert!(html.contains("<code>npm</code>"));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let html = render("## Custom Anchor {#custom}");
        assert!(html.contains(r#"id="custom""#));
    }

    #[test]
    fn test_paragraph_rendering() {
        let html = render("hello *world*");
        assert!(html.contains("<p>hello <em>world</em></p>"));
    }

    #[test]
    fn test_gfm_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_gfm_disabled() {
        let html = MarkdownRenderer::new()
            .with_gfm(false)
            .render_str("~~gone~~");
        assert!(!html.contains("<del>"));
    }

    #[test]
    fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(&path, "# Title\n\nbody text").unwrap();

        let html = MarkdownRenderer::new().render_file(&path).unwrap();
        assert!(html.contains(r#"<h1 id="title">Title</h1>"#));
        assert!(html.contains("<p>body text</p>"));
    }
}
