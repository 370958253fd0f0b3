//! Structured key paths into a document.
//!
//! A [`KeyPath`] is a list of segments from the root to a node. It is only
//! turned into text at the edges: the dotted display form
//! (`rec1.items[0].name`) used for merged result keys and the CLI, and the
//! JSON Pointer form (`/rec1/items/0/name`).

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One step of a [`KeyPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl PathSegment {
    /// The segment as a plain mapping key: the key itself, or the index in decimal.
    pub fn entry_key(&self) -> String {
        match self {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Location of a node inside a document, from the root.
///
/// Ordering is segment-wise, with keys compared as strings and indices
/// numerically, so `items[2]` sorts before `items[10]`.
///
/// ```
/// use teddy_lib::path::KeyPath;
///
/// let path = KeyPath::root().key("items").index(0).key("name");
/// assert_eq!(path.to_string(), "items[0].name");
/// assert_eq!(path.to_pointer(), "/items/0/name");
/// assert_eq!("items[0].name".parse::<KeyPath>().unwrap(), path);
/// ```
///
/// Keys containing `.`, `[` or `]` display fine but cannot be parsed back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// The empty path, pointing at the document itself
    pub fn root() -> Self {
        KeyPath {
            segments: Vec::new(),
        }
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        KeyPath { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder style)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder style)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Path of the containing node, `None` for the root
    pub fn parent(&self) -> Option<KeyPath> {
        let (_, rest) = self.segments.split_last()?;
        Some(KeyPath::from_segments(rest.to_vec()))
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// JSON Pointer (RFC 6901) rendering, `""` for the root
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Key(k) => out.push_str(&escape_pointer_token(k)),
                PathSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }

    /// Parse the dotted display form.
    ///
    /// Segments are separated by `.`; each is a key optionally followed by
    /// any number of `[digits]` suffixes. Only the first segment may omit the
    /// key (`[0].name`). The empty string is the root path.
    pub fn parse(input: &str) -> Result<KeyPath> {
        let chars: Vec<char> = input.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;
        let mut first = true;

        while i < chars.len() {
            let key_start = i;
            while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                if chars[i] == ']' {
                    return Err(Error::malformed_path(input, i, "unexpected ']'"));
                }
                i += 1;
            }
            if i > key_start {
                segments.push(PathSegment::Key(chars[key_start..i].iter().collect()));
            } else if !(first && i < chars.len() && chars[i] == '[') {
                return Err(Error::malformed_path(input, i, "empty key"));
            }

            while i < chars.len() && chars[i] == '[' {
                let open = i;
                i += 1;
                let digits_start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i == digits_start {
                    return Err(Error::malformed_path(input, i, "expected index digits"));
                }
                if i >= chars.len() || chars[i] != ']' {
                    return Err(Error::malformed_path(input, open, "unclosed bracket"));
                }
                let digits: String = chars[digits_start..i].iter().collect();
                let idx = digits
                    .parse::<usize>()
                    .map_err(|e| Error::malformed_path(input, digits_start, e.to_string()))?;
                segments.push(PathSegment::Index(idx));
                i += 1;
            }

            if i == chars.len() {
                break;
            }
            if chars[i] != '.' {
                return Err(Error::malformed_path(
                    input,
                    i,
                    format!("unexpected character '{}'", chars[i]),
                ));
            }
            i += 1;
            if i == chars.len() {
                return Err(Error::malformed_path(input, i, "trailing '.'"));
            }
            first = false;
        }

        Ok(KeyPath { segments })
    }
}

// JSON Pointer token escape (~0, ~1)
pub fn escape_pointer_token(raw: &str) -> String {
    raw.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if pos > 0 => write!(f, ".{}", k)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyPath::parse(s)
    }
}

impl From<Vec<PathSegment>> for KeyPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        KeyPath::from_segments(segments)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        KeyPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}
