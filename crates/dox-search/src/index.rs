//! The full-text search index.
//!
//! A compact inverted index over page sections. All internal maps are
//! `BTreeMap`s so that serializing the same logical index always produces
//! byte-identical output: rebuilding from unchanged sources yields an
//! artifact that is equal byte-for-byte, which the incremental build
//! relies on for its idempotence guarantee.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dox_sections::Section;

/// Index-time weight of a term occurring in a section's own title.
const TITLE_WEIGHT: u32 = 4;
/// Index-time weight of a term occurring in the breadcrumb titles.
const BREADCRUMB_WEIGHT: u32 = 2;
/// Query-time score per weighted occurrence of an exactly matched token.
const EXACT_SCORE: u64 = 10;
/// Query-time score per weighted occurrence of a prefix-matched token.
const PREFIX_SCORE: u64 = 3;

/// Searchable fields and display metadata of one indexed section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedSection {
    /// Owning document id.
    pub doc_id: String,
    /// Heading anchor; empty for the page-level section.
    pub anchor: String,
    /// Own heading title (page title for page-level sections).
    pub title: Option<String>,
    /// Ancestor heading titles, shallowest first.
    pub titles: Vec<String>,
    /// Indexed plain text.
    pub text: String,
    /// Raw HTML fragment for snippet rendering.
    pub html: String,
    /// Whether this is the page-level section.
    pub is_page: bool,
}

/// A ranked query match.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    /// Section id (`{doc_id}#{anchor}`).
    pub id: String,
    /// Relevance score; higher is better.
    pub score: u64,
    /// The matched section.
    pub section: IndexedSection,
}

/// Full-text search index over all sections of all documents.
///
/// Built once per build cycle and immutable once persisted. Section ids
/// are reconstructible from `(document id, anchor)` alone, so re-indexing
/// an unchanged document yields identical ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Section id -> stored section.
    sections: BTreeMap<String, IndexedSection>,
    /// Term -> section id -> weighted term frequency.
    terms: BTreeMap<String, BTreeMap<String, u32>>,
}

/// Synthetic section id: `{doc_id}#{anchor}`.
#[must_use]
pub fn section_id(doc_id: &str, anchor: &str) -> String {
    format!("{doc_id}#{anchor}")
}

impl SearchIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every section of a document to the index.
    ///
    /// Terms from the section text are indexed at weight 1, breadcrumb
    /// titles at weight 2, and the section's own title at weight 4.
    pub fn add_document(&mut self, doc_id: &str, sections: &[Section]) {
        for section in sections {
            let id = section_id(doc_id, &section.anchor);

            self.index_terms(&id, &section.text, 1);
            for title in &section.titles {
                self.index_terms(&id, title, BREADCRUMB_WEIGHT);
            }
            if let Some(title) = &section.title {
                self.index_terms(&id, title, TITLE_WEIGHT);
            }

            self.sections.insert(
                id,
                IndexedSection {
                    doc_id: doc_id.to_owned(),
                    anchor: section.anchor.clone(),
                    title: section.title.clone(),
                    titles: section.titles.clone(),
                    text: section.text.clone(),
                    html: section.html.clone(),
                    is_page: section.is_page,
                },
            );
        }
    }

    /// Number of indexed sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the index contains no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a stored section by its id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&IndexedSection> {
        self.sections.get(id)
    }

    /// Iterate over all stored sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &IndexedSection)> {
        self.sections.iter().map(|(id, s)| (id.as_str(), s))
    }

    /// Run a full-text query, returning ranked matches.
    ///
    /// Each query token matches exactly and by prefix; exact matches
    /// score higher. Results are ordered by descending score, then by
    /// section id for a stable total order.
    #[must_use]
    pub fn query(&self, text: &str) -> Vec<SearchHit> {
        let mut scores: BTreeMap<&str, u64> = BTreeMap::new();

        for token in tokenize(text) {
            for (term, postings) in self.terms.range(token.clone()..) {
                if !term.starts_with(&token) {
                    break;
                }
                let per_occurrence = if *term == token {
                    EXACT_SCORE
                } else {
                    PREFIX_SCORE
                };
                for (id, weight) in postings {
                    *scores.entry(id.as_str()).or_default() +=
                        per_occurrence * u64::from(*weight);
                }
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(id, score)| {
                self.sections.get(id).map(|section| SearchHit {
                    id: id.to_owned(),
                    score,
                    section: section.clone(),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits
    }

    /// Record weighted occurrences of every token in `text`.
    fn index_terms(&mut self, id: &str, text: &str, weight: u32) {
        for token in tokenize(text) {
            *self
                .terms
                .entry(token)
                .or_default()
                .entry(id.to_owned())
                .or_default() += weight;
        }
    }
}

/// Lowercased alphanumeric tokens of `text`.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(text: &str) -> Section {
        Section {
            anchor: String::new(),
            titles: Vec::new(),
            title: None,
            text: text.to_owned(),
            html: format!("<p>{text}</p>"),
            is_page: true,
        }
    }

    fn anchored(anchor: &str, title: &str, text: &str) -> Section {
        Section {
            anchor: anchor.to_owned(),
            titles: Vec::new(),
            title: Some(title.to_owned()),
            text: text.to_owned(),
            html: format!("<h2 id=\"{anchor}\">{title}</h2><p>{text}</p>"),
            is_page: false,
        }
    }

    #[test]
    fn test_section_ids_are_reconstructible() {
        assert_eq!(section_id("/guide", "intro"), "/guide#intro");
        assert_eq!(section_id("/guide", ""), "/guide#");
    }

    #[test]
    fn test_exact_match() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("hello world")]);
        index.add_document("/b", &[page("goodbye world")]);

        let hits = index.query("hello");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "/a#");
        assert_eq!(hits[0].section.doc_id, "/a");
    }

    #[test]
    fn test_prefix_match() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("installation instructions")]);

        let hits = index.query("instal");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "/a#");
    }

    #[test]
    fn test_exact_outranks_prefix() {
        let mut index = SearchIndex::new();
        index.add_document("/exact", &[page("cache behavior")]);
        index.add_document("/prefix", &[page("caches and caching")]);

        let hits = index.query("cache");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "/exact#");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_title_terms_outrank_body_terms() {
        let mut index = SearchIndex::new();
        index.add_document("/body", &[anchored("s", "Other", "install notes")]);
        index.add_document("/title", &[anchored("s", "Install", "other notes")]);

        let hits = index.query("install");
        assert_eq!(hits[0].id, "/title#s");
    }

    #[test]
    fn test_breadcrumb_titles_are_searchable() {
        let mut index = SearchIndex::new();
        let mut section = anchored("linux", "Linux", "apt things");
        section.titles = vec!["Guide".to_owned(), "Install".to_owned()];
        index.add_document("/guide", &[section]);

        let hits = index.query("guide");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "/guide#linux");
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("Hello World")]);

        assert_eq!(index.query("hello").len(), 1);
        assert_eq!(index.query("HELLO").len(), 1);
    }

    #[test]
    fn test_multi_token_query_accumulates() {
        let mut index = SearchIndex::new();
        index.add_document("/both", &[page("alpha beta")]);
        index.add_document("/one", &[page("alpha gamma")]);

        let hits = index.query("alpha beta");
        assert_eq!(hits[0].id, "/both#");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_no_match() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("hello world")]);

        assert!(index.query("absent").is_empty());
    }

    #[test]
    fn test_empty_query() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("hello")]);

        assert!(index.query("").is_empty());
        assert!(index.query("  \t ").is_empty());
    }

    #[test]
    fn test_add_document_order_does_not_affect_serialization() {
        let a = [page("alpha")];
        let b = [anchored("s", "Beta", "beta body")];

        let mut first = SearchIndex::new();
        first.add_document("/a", &a);
        first.add_document("/b", &b);

        let mut second = SearchIndex::new();
        second.add_document("/b", &b);
        second.add_document("/a", &a);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut index = SearchIndex::new();
        index.add_document("/a", &[page("hello"), anchored("x", "X", "body")]);

        let bytes = serde_json::to_vec(&index).unwrap();
        let restored: SearchIndex = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(index, restored);
        assert_eq!(restored.query("hello").len(), 1);
    }
}
