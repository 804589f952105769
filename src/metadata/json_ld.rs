//! JSON-LD Structured Data
//!
//! Decodes `<script type="application/ld+json">` blocks into schema.org
//! objects and reads the author and date properties the resolver cares about.
//! Blocks with invalid JSON are skipped, never fatal.

use dom_query::Document;
use serde_json::{Map, Value};

use crate::dom;

/// Date properties checked on each schema object, in priority order.
pub const DATE_KEYS: &[&str] = &[
    "datePublished",
    "dateCreated",
    "uploadDate",
    "dateModified",
    "publishedDate",
];

/// Parse all JSON-LD blocks of a document.
///
/// Invalid blocks are dropped. Order follows the document.
#[must_use]
pub fn decode_json_ld(doc: &Document) -> Vec<Value> {
    dom::json_ld_scripts(doc)
        .iter()
        .filter_map(|text| match serde_json::from_str::<Value>(text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::trace!(error = %err, "skipping invalid JSON-LD block");
                None
            }
        })
        .collect()
}

/// Flatten JSON-LD documents into the schema objects they describe.
///
/// A document may be a single object, an array of objects, or an object
/// carrying an `@graph` array; all three are flattened in order, with the
/// container itself first.
#[must_use]
pub fn schema_objects(documents: &[Value]) -> Vec<&Map<String, Value>> {
    let mut objects = Vec::new();
    for document in documents {
        collect_objects(document, &mut objects);
    }
    objects
}

fn collect_objects<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Object(map) => {
            out.push(map);
            if let Some(graph) = map.get("@graph") {
                collect_objects(graph, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_objects(item, out);
            }
        }
        _ => {}
    }
}

/// First author name across all schema objects.
///
/// Accepts `"author": "Name"`, `"author": {"name": "Name"}`, and arrays of
/// either (first usable entry wins).
#[must_use]
pub fn extract_author(documents: &[Value]) -> Option<String> {
    schema_objects(documents)
        .into_iter()
        .filter_map(|object| object.get("author"))
        .find_map(author_name)
}

fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => non_empty(name),
        Value::Object(map) => map.get("name").and_then(Value::as_str).and_then(non_empty),
        Value::Array(items) => items.iter().find_map(author_name),
        _ => None,
    }
}

/// Raw date strings from every schema object, in collector order:
/// object by object, and within each object by [`DATE_KEYS`].
#[must_use]
pub fn date_candidates(documents: &[Value]) -> Vec<String> {
    let mut candidates = Vec::new();
    for object in schema_objects(documents) {
        for key in DATE_KEYS {
            if let Some(raw) = object.get(*key).and_then(Value::as_str).and_then(non_empty) {
                candidates.push(raw);
            }
        }
    }
    candidates
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(html: &str) -> Vec<Value> {
        decode_json_ld(&Document::from(html))
    }

    #[test]
    fn test_author_object() {
        let docs = decode(
            r#"<script type="application/ld+json">
            {"@type": "Article", "author": {"@type": "Person", "name": "John Doe"}}
            </script>"#,
        );
        assert_eq!(extract_author(&docs), Some("John Doe".to_string()));
    }

    #[test]
    fn test_author_array_and_string() {
        let docs = decode(
            r#"<script type="application/ld+json">
            {"@type": "Article", "author": [{"@type": "Person", "name": "  "}, {"name": "Ada"}]}
            </script>"#,
        );
        assert_eq!(extract_author(&docs), Some("Ada".to_string()));

        let docs = decode(r#"<script type="application/ld+json">{"author": "Grace"}</script>"#);
        assert_eq!(extract_author(&docs), Some("Grace".to_string()));
    }

    #[test]
    fn test_graph_and_array_documents_are_flattened() {
        let docs = decode(
            r#"<script type="application/ld+json">
            {"@graph": [{"@type": "WebSite"}, {"@type": "NewsArticle", "datePublished": "2024-02-03"}]}
            </script>
            <script type="application/ld+json">
            [{"@type": "VideoObject", "uploadDate": "2023-01-01"}]
            </script>"#,
        );
        assert_eq!(schema_objects(&docs).len(), 4);
        assert_eq!(date_candidates(&docs), vec!["2024-02-03", "2023-01-01"]);
    }

    #[test]
    fn test_date_keys_priority_within_object() {
        let docs = decode(
            r#"<script type="application/ld+json">
            {"dateModified": "2024-05-01", "datePublished": "2024-01-01"}
            </script>"#,
        );
        assert_eq!(date_candidates(&docs), vec!["2024-01-01", "2024-05-01"]);
    }

    #[test]
    fn test_invalid_json_skipped() {
        let docs = decode(
            r#"<script type="application/ld+json">{ invalid json here }</script>
            <script type="application/ld+json">{"author": "Valid"}</script>"#,
        );
        assert_eq!(docs.len(), 1);
        assert_eq!(extract_author(&docs), Some("Valid".to_string()));
    }
}
