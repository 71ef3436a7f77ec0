//! Path segments and read-only path lookup.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// One step from a container to its child.
///
/// Viewers send keys as strings and positions as numbers, so both forms are
/// accepted against both container kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object key.
    Key(String),
}

impl PathSegment {
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        PathSegment::Key(k.into())
    }

    #[inline]
    pub fn index(i: usize) -> Self {
        PathSegment::Index(i)
    }

    /// The segment spelled as an object key.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Key(k) => Cow::Borrowed(k),
            PathSegment::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The segment read as an array index, if it is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => parse_index(k),
        }
    }
}

/// Only canonical decimal spellings count as indices, so `"01"` stays a key.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Key(s.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        PathSegment::Key(s)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// Joins a path with dots, e.g. `a.0.b`. Empty for the root.
pub fn dotted(path: &[PathSegment]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&segment.as_key());
    }
    out
}

/// Get the node at `path`, or `None` if any step is missing.
pub fn get<'a>(node: &'a Node, path: &[PathSegment]) -> Option<&'a Node> {
    let mut current = node;
    for segment in path {
        current = current.child(segment)?;
    }
    Some(current)
}
