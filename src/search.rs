//! Depth-first search over a document by key or by value.

use crate::path::{KeyPath, PathSegment};
use crate::tree::{text_matches, values_equal};
use crate::types::{Match, Query, SearchResponse};
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Find every node in `document` matching `query`.
///
/// Nodes are visited in pre-order: an entry is tested before its subtree,
/// mapping entries and sequence elements in their natural order. A match
/// does not stop descent, so nested matches are all reported. The root has
/// no key and is never itself a match. Never fails; no hit is an empty list.
///
/// ```
/// use serde_json::json;
/// use teddy_lib::search::search;
/// use teddy_lib::types::Query;
///
/// let doc = json!({"a": {"b": 1}});
/// let hits = search(&doc, &Query::value(1), true);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].path.to_string(), "a.b");
/// ```
pub fn search<'a>(document: &'a Value, query: &Query, strict: bool) -> Vec<Match<'a>> {
    let matcher = Matcher::new(query, strict);
    let mut results = Vec::new();
    let mut current = KeyPath::root();
    search_recursive(document, &matcher, &mut current, &mut results);
    debug!(
        query = query.kind(),
        strict,
        matches = results.len(),
        "search finished"
    );
    results
}

/// [`search`], then slice `offset..offset + limit` out of the hits.
pub fn search_page<'a>(
    document: &'a Value,
    query: &Query,
    strict: bool,
    offset: usize,
    limit: usize,
) -> SearchResponse<'a> {
    let all_results = search(document, query, strict);
    let total_count = all_results.len();
    let results: Vec<Match<'a>> = all_results.into_iter().skip(offset).take(limit).collect();
    let has_more = offset.saturating_add(limit) < total_count;

    SearchResponse {
        results,
        total_count,
        has_more,
    }
}

/// Run the same query over independent documents in parallel.
/// Output order follows `documents`.
pub fn search_all<'a>(documents: &'a [Value], query: &Query, strict: bool) -> Vec<Vec<Match<'a>>> {
    documents
        .par_iter()
        .map(|doc| search(doc, query, strict))
        .collect()
}

fn search_recursive<'a>(
    value: &'a Value,
    matcher: &Matcher<'_>,
    current: &mut KeyPath,
    results: &mut Vec<Match<'a>>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter() {
                current.push(PathSegment::Key(key.clone()));
                if matcher.matches_entry(Some(key), child) {
                    results.push(Match {
                        path: current.clone(),
                        value: child,
                    });
                }
                search_recursive(child, matcher, current, results);
                current.pop();
            }
        }
        Value::Array(arr) => {
            for (index, item) in arr.iter().enumerate() {
                current.push(PathSegment::Index(index));
                if matcher.matches_entry(None, item) {
                    results.push(Match {
                        path: current.clone(),
                        value: item,
                    });
                }
                search_recursive(item, matcher, current, results);
                current.pop();
            }
        }
        _ => {}
    }
}

/// A query compiled for one traversal; lowercased needles are computed once.
enum Matcher<'q> {
    KeyExact(&'q str),
    KeyFuzzy(String),
    KeyPattern(&'q Regex),
    ValueExact(&'q Value),
    ValueFuzzy { target: &'q Value, needle: String },
}

impl<'q> Matcher<'q> {
    fn new(query: &'q Query, strict: bool) -> Self {
        match (query, strict) {
            (Query::Key(k), true) => Matcher::KeyExact(k),
            (Query::Key(k), false) => Matcher::KeyFuzzy(k.to_lowercase()),
            (Query::KeyPattern(re), _) => Matcher::KeyPattern(re),
            (Query::Value(v), true) => Matcher::ValueExact(v),
            (Query::Value(v), false) => {
                let needle = match v {
                    Value::String(s) => s.to_lowercase(),
                    Value::Number(_) | Value::Bool(_) | Value::Null => v.to_string().to_lowercase(),
                    Value::Object(_) | Value::Array(_) => String::new(),
                };
                Matcher::ValueFuzzy { target: v, needle }
            }
        }
    }

    /// `key` is `None` for sequence elements, which only value queries can hit.
    fn matches_entry(&self, key: Option<&str>, node: &Value) -> bool {
        match self {
            Matcher::KeyExact(q) => key == Some(*q),
            Matcher::KeyFuzzy(needle) => key.is_some_and(|k| text_matches(k, needle)),
            Matcher::KeyPattern(re) => key.is_some_and(|k| re.is_match(k)),
            Matcher::ValueExact(target) => values_equal(node, target),
            Matcher::ValueFuzzy { target, needle } => {
                values_equal(node, target) || overlaps(node, target, needle)
            }
        }
    }
}

fn overlaps(node: &Value, target: &Value, needle: &str) -> bool {
    match (target, node) {
        (Value::String(_), Value::String(s)) => text_matches(s, needle),
        (Value::String(_), Value::Number(n)) => text_matches(&n.to_string(), needle),
        (Value::String(_), Value::Bool(b)) => text_matches(&b.to_string(), needle),
        (Value::Number(_) | Value::Bool(_) | Value::Null, Value::String(s)) => {
            s.trim().to_lowercase() == needle
        }
        (Value::Object(want), Value::Object(have)) => {
            want
                .iter()
                .all(|(k, v)| have.get(k).is_some_and(|h| values_equal(h, v)))
        }
        (Value::Array(want), Value::Array(have)) => want
            .iter()
            .all(|w| have.iter().any(|h| values_equal(h, w))),
        _ => false,
    }
}
