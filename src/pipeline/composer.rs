//! Citation assembly for generated answers.

use std::collections::HashSet;

use crate::pipeline::types::SourceRef;
use crate::search::SearchResultItem;

/// Whether the result set carries any snippet text worth grounding on.
///
/// A backend can return matches whose extracted content is entirely blank;
/// those give the model nothing citable and are treated as no grounding.
pub(crate) fn has_grounding(results: &[SearchResultItem]) -> bool {
    results.iter().any(|item| !item.snippet.trim().is_empty())
}

/// Deduplicate sources by URI while preserving first-seen order.
///
/// Items without a URI are keyed by title so unlinked duplicates collapse
/// without merging unrelated documents under one empty key.
pub(crate) fn dedupe_sources(results: &[SearchResultItem]) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for item in results {
        if item.title.is_empty() && item.uri.is_empty() {
            continue;
        }
        let key = if item.uri.is_empty() {
            format!("title:{}", item.title)
        } else {
            format!("uri:{}", item.uri)
        };
        if seen.insert(key) {
            sources.push(SourceRef {
                title: item.title.clone(),
                uri: item.uri.clone(),
            });
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, uri: &str, snippet: &str) -> SearchResultItem {
        SearchResultItem {
            title: title.into(),
            uri: uri.into(),
            snippet: snippet.into(),
        }
    }

    #[test]
    fn dedupe_preserves_first_seen_order() {
        let results = vec![
            item("Doc B", "https://example.com/b", "text"),
            item("Doc A", "https://example.com/a", "text"),
            item("Doc B again", "https://example.com/b", "text"),
        ];
        let sources = dedupe_sources(&results);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Doc B");
        assert_eq!(sources[1].uri, "https://example.com/a");
    }

    #[test]
    fn dedupe_keys_unlinked_items_by_title() {
        let results = vec![
            item("Doc A", "", "text"),
            item("Doc B", "", "text"),
            item("Doc A", "", "more text"),
        ];
        let sources = dedupe_sources(&results);
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn dedupe_skips_items_without_title_or_uri() {
        let results = vec![item("", "", "orphaned snippet")];
        assert!(dedupe_sources(&results).is_empty());
    }

    #[test]
    fn grounding_requires_at_least_one_nonblank_snippet() {
        assert!(!has_grounding(&[]));
        assert!(!has_grounding(&[item("Doc", "https://e", "  ")]));
        assert!(has_grounding(&[
            item("Doc", "https://e", ""),
            item("Doc 2", "https://e2", "content"),
        ]));
    }
}
