//! Name-based addressing of entries inside a snapshot.
//!
//! Sibling names are unique, so the list of names below the root identifies
//! at most one entry per snapshot.

use std::fmt;
use std::str::FromStr;

/// Names from the root (exclusive) down to an entry (inclusive).
///
/// The root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the containing node, `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn join(&self, name: impl Into<String>) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Parses `a/b/c`. Empty segments are dropped, so `""`, `"/"` and `"a//b/"`
/// are accepted; names containing `/` can only be addressed via [`NodePath::new`].
impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split('/').filter(|seg| !seg.is_empty())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_slash_string_when_parsing_then_splits_segments() {
        let path: NodePath = "a/b/c".parse().unwrap();
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.name(), Some("c"));
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn given_empty_or_slash_when_parsing_then_is_root() {
        assert!("".parse::<NodePath>().unwrap().is_root());
        assert!("/".parse::<NodePath>().unwrap().is_root());
        assert_eq!("/a//b/".parse::<NodePath>().unwrap(), NodePath::new(["a", "b"]));
    }

    #[test]
    fn given_path_when_taking_parent_then_drops_last_segment() {
        let path = NodePath::new(["a", "b"]);
        assert_eq!(path.parent(), Some(NodePath::new(["a"])));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(NodePath::root().join("x"), NodePath::new(["x"]));
    }

    #[test]
    fn given_paths_when_displaying_then_joins_with_slash() {
        assert_eq!(NodePath::new(["a", "b"]).to_string(), "a/b");
        assert_eq!(NodePath::root().to_string(), "/");
    }
}
