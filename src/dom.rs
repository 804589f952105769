//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` shared by the HTML meta extractor and the
//! date collectors: attribute access, normalized text, a one-pass index of
//! `<meta>` tags, and raw JSON-LD script bodies.

pub use dom_query::{Document, Selection};

// === Attribute Operations ===

/// Get any attribute value, trimmed; empty values count as absent.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Check if attribute exists
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

// === Text Content ===

/// Text content with runs of whitespace collapsed to single spaces.
#[must_use]
pub fn normalized_text(sel: &Selection) -> String {
    collapse_whitespace(&sel.text())
}

/// Collapse whitespace runs and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// === Meta Tags ===

/// Every `<meta>` tag of a document, keyed by its lowercased `name`,
/// `property`, or `itemprop` attribute, in document order.
///
/// Built once per page so the extractor and the date collectors don't walk
/// the tree for every key they look up.
#[derive(Debug, Clone, Default)]
pub struct MetaIndex {
    entries: Vec<(String, String)>,
}

impl MetaIndex {
    /// Index all meta tags with a key and non-empty `content`.
    #[must_use]
    pub fn build(doc: &Document) -> Self {
        let mut entries = Vec::new();

        for node in doc.select("meta").nodes() {
            let meta = Selection::from(*node);
            let Some(content) = get_attribute(&meta, "content") else {
                continue;
            };

            for attr in ["name", "property", "itemprop"] {
                if let Some(key) = get_attribute(&meta, attr) {
                    entries.push((key.to_lowercase(), content.clone()));
                }
            }
        }

        Self { entries }
    }

    /// All contents stored under `key` (lowercase), in document order.
    pub fn all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First content stored under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).next()
    }

    /// First content found for the earliest key in `keys`.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.first(key))
    }
}

// === Structured Data ===

/// Raw bodies of all `<script type="application/ld+json">` blocks.
///
/// The type matches case-insensitively and may carry parameters
/// (`application/ld+json; charset=utf-8`).
#[must_use]
pub fn json_ld_scripts(doc: &Document) -> Vec<String> {
    doc.select("script[type]")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|script| {
            script
                .attr("type")
                .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with("application/ld+json"))
        })
        .map(|script| script.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
