//! Heading-based page sectioning for dox.
//!
//! A rendered HTML page is partitioned into an ordered sequence of
//! [`Section`]s: one page-level section followed by one anchored section
//! per heading that carries an `id` attribute. Sections never nest or
//! overlap; they are a strictly sequential partition of the page body.
//!
//! The splitter operates on a parsed event stream ([`quick-xml`]), not on
//! string scanning, so heading boundaries are unambiguous.
//!
//! [`quick-xml`]: https://docs.rs/quick-xml

mod split;

pub use split::split_page;

/// An indexable, anchor-addressable fragment of a rendered page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Heading anchor (`id` attribute). Empty for the page-level section.
    pub anchor: String,
    /// Ancestor heading titles, shallowest first (display breadcrumb).
    pub titles: Vec<String>,
    /// Own heading title; the page title for the page-level section.
    pub title: Option<String>,
    /// Plain text for tokenization, whitespace-normalized.
    pub text: String,
    /// Raw HTML fragment for result snippet rendering.
    pub html: String,
    /// Whether this is the page-level section. Always first, never anchored.
    pub is_page: bool,
}
