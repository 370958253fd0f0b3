use crate::error::Result;
use crate::path::{KeyPath, PathSegment};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// What to look for in a document.
#[derive(Debug, Clone)]
pub enum Query {
    /// Mapping entries whose key equals (strict) or contains (fuzzy) the string
    Key(String),
    /// Nodes equal to (strict) or overlapping (fuzzy) the value
    Value(Value),
    /// Mapping entries whose key matches the regex; strictness is ignored
    KeyPattern(Regex),
}

impl Query {
    pub fn key(key: impl Into<String>) -> Self {
        Query::Key(key.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Query::Value(value.into())
    }

    pub fn key_pattern(pattern: &str) -> Result<Self> {
        Ok(Query::KeyPattern(Regex::new(pattern)?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Query::Key(_) => "key",
            Query::Value(_) => "value",
            Query::KeyPattern(_) => "pattern",
        }
    }
}

/// A node found by a query, borrowed from the searched document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<'a> {
    pub path: KeyPath,
    pub value: &'a Value,
}

impl<'a> Match<'a> {
    /// Path of the mapping or sequence holding the matched entry
    pub fn record_path(&self) -> KeyPath {
        self.path.parent().unwrap_or_default()
    }

    /// The entry key under which the node sits in its parent
    pub fn entry_key(&self) -> String {
        self.path
            .last()
            .map(PathSegment::entry_key)
            .unwrap_or_default()
    }

    pub fn to_owned_match(&self) -> OwnedMatch {
        OwnedMatch {
            path: self.path.clone(),
            value: self.value.clone(),
        }
    }
}

/// A [`Match`] detached from the document it was found in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedMatch {
    pub path: KeyPath,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub results: Vec<Match<'a>>,
    pub total_count: usize,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_entry_and_record() {
        let leaf = json!("foo");
        let m = Match {
            path: KeyPath::root().key("rec1").key("name"),
            value: &leaf,
        };
        assert_eq!(m.entry_key(), "name");
        assert_eq!(m.record_path(), KeyPath::root().key("rec1"));
    }

    #[test]
    fn test_match_entry_key_for_index() {
        let leaf = json!(3);
        let m = Match {
            path: KeyPath::root().key("ids").index(4),
            value: &leaf,
        };
        assert_eq!(m.entry_key(), "4");
    }

    #[test]
    fn test_match_serializes_display_path() {
        let leaf = json!(1);
        let m = Match {
            path: KeyPath::root().key("a").key("b"),
            value: &leaf,
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"path": "a.b", "value": 1})
        );
    }

    #[test]
    fn test_bad_key_pattern_is_error() {
        assert!(Query::key_pattern("(unclosed").is_err());
        assert_eq!(Query::key_pattern("^na").unwrap().kind(), "pattern");
    }
}
