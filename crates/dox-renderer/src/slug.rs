//! Heading slug generation.

/// Convert heading text to a URL-safe anchor slug.
///
/// Lowercases the input and joins alphanumeric runs with single hyphens.
/// Non-ASCII alphanumerics are kept (anchors are UTF-8).
///
/// # Examples
///
/// ```
/// use dox_renderer::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What's new in 2.0?"), "what-s-new-in-2-0");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
