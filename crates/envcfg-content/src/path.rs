//! Key paths for locating values inside a document
//!
//! Renderers carry a `KeyPath` while they descend so structural errors can
//! name the offending entry, e.g. `tracker.udp_trackers[0].tls`.

use std::fmt;

/// A segment of a path - either a key or a list index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A key in an object
    Key(String),
    /// An index in a list
    Index(usize),
}

/// Location of a value relative to the document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to `key` inside the object at this path.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self { segments }
    }

    /// Path to element `index` of the list at this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
