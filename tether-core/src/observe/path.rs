//! Dotted property paths such as `user.name`.

use std::fmt;

use smallvec::SmallVec;

/// A property name or a dotted chain of property names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: SmallVec<[String; 4]>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the path names a single top-level property.
    pub fn is_single(&self) -> bool {
        self.segments.len() == 1
    }

    /// The first `len` segments joined back into a dotted string.
    pub(crate) fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for PropertyPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&PropertyPath> for PropertyPath {
    fn from(path: &PropertyPath) -> Self {
        path.clone()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
