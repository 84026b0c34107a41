//! Field paths for diagnostics.
//!
//! A [`FieldPath`] locates a value inside the decoded response, for example
//! `addresses[2].unit.floor`. Every schema mismatch carries one so that a
//! failure can be traced back to the exact spot in the model's output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

/// Location of a value inside a decoded JSON tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root of the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path with a single key segment.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::root().key(name)
    }

    /// Extend this path with an object key.
    #[must_use]
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(name.into()));
        next
    }

    /// Extend this path with an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// Whether this path points at the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last key segment, i.e. the name of the field this path ends in.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            PathSegment::Key(k) => Some(k.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// The segments of this path, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "$");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_nested_display() {
        let path = FieldPath::field("addresses").index(2).key("unit").key("floor");
        assert_eq!(path.to_string(), "addresses[2].unit.floor");
        assert_eq!(path.leaf(), Some("floor"));
    }

    #[test]
    fn test_leaf_skips_indices() {
        let path = FieldPath::field("tags").index(0);
        assert_eq!(path.leaf(), Some("tags"));
        assert_eq!(FieldPath::root().index(3).leaf(), None);
    }

    #[test]
    fn test_key_does_not_mutate_parent() {
        let parent = FieldPath::field("a");
        let _child = parent.key("b");
        assert_eq!(parent.segments().len(), 1);
    }
}
