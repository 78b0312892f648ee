//! Edit intents handed to the engine by a dispatcher.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::domain::builder::leaf_content;
use crate::domain::entry::{Entry, Leaf, Node};
use crate::domain::path::NodePath;

/// Specification of an entry to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewEntry {
    Node { name: String },
    Leaf { name: String, content: String },
}

impl NewEntry {
    pub fn name(&self) -> &str {
        match self {
            NewEntry::Node { name } | NewEntry::Leaf { name, .. } => name,
        }
    }

    /// Materialize as a fresh entry at `depth`.
    ///
    /// Leaf text is trimmed at the end and stored as a JSON string, the same
    /// encoding ingestion gives string values.
    pub fn to_entry(&self, depth: usize) -> Entry {
        match self {
            NewEntry::Node { name } => Entry::node(Node::new(name.clone(), depth)),
            NewEntry::Leaf { name, content } => {
                let content = leaf_content(&Value::String(content.trim_end().to_string()));
                Entry::leaf(Leaf::new(name.clone(), content, depth))
            }
        }
    }
}

/// One structural edit, addressed by name paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    /// Add under `parent`; `None` replaces the root.
    AddChild {
        parent: Option<NodePath>,
        entry: NewEntry,
    },
    RemoveChild {
        target: NodePath,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentParseError {
    #[error("unknown edit '{0}', expected node:PATH, leaf:PATH=CONTENT, root:NAME or rm:PATH")]
    UnknownKind(String),

    #[error("missing name in edit '{0}'")]
    MissingName(String),

    #[error("missing '=' between path and content in edit '{0}'")]
    MissingContent(String),
}

/// Textual form used on the command line:
///
/// - `node:a/b/new`: add an empty node `new` under `a/b`
/// - `leaf:a/b/new=content`: add a leaf holding `content` as text
/// - `root:name`: replace the root with an empty node
/// - `rm:a/b`: remove `a/b`
///
/// New names are trimmed at the end, as a form would do before dispatching.
impl FromStr for EditIntent {
    type Err = IntentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| IntentParseError::UnknownKind(s.to_string()))?;
        match kind {
            "node" => {
                let (parent, name) = split_new(rest, s)?;
                Ok(EditIntent::AddChild {
                    parent: Some(parent),
                    entry: NewEntry::Node { name },
                })
            }
            "leaf" => {
                let (path, content) = rest
                    .split_once('=')
                    .ok_or_else(|| IntentParseError::MissingContent(s.to_string()))?;
                let (parent, name) = split_new(path, s)?;
                Ok(EditIntent::AddChild {
                    parent: Some(parent),
                    entry: NewEntry::Leaf {
                        name,
                        content: content.to_string(),
                    },
                })
            }
            "root" => {
                let name = rest.trim_end();
                if name.is_empty() {
                    return Err(IntentParseError::MissingName(s.to_string()));
                }
                Ok(EditIntent::AddChild {
                    parent: None,
                    entry: NewEntry::Node {
                        name: name.to_string(),
                    },
                })
            }
            "rm" => Ok(EditIntent::RemoveChild {
                target: parse_path(rest),
            }),
            _ => Err(IntentParseError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for EditIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditIntent::AddChild { parent: None, entry } => write!(f, "root:{}", entry.name()),
            EditIntent::AddChild {
                parent: Some(parent),
                entry,
            } => {
                let path = parent.join(entry.name());
                match entry {
                    NewEntry::Node { .. } => write!(f, "node:{}", path),
                    NewEntry::Leaf { content, .. } => write!(f, "leaf:{}={}", path, content),
                }
            }
            EditIntent::RemoveChild { target } => write!(f, "rm:{}", target),
        }
    }
}

fn parse_path(s: &str) -> NodePath {
    match s.parse() {
        Ok(path) => path,
        Err(never) => match never {},
    }
}

fn split_new(path: &str, whole: &str) -> Result<(NodePath, String), IntentParseError> {
    let full = parse_path(path);
    let name = full
        .name()
        .map(str::trim_end)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| IntentParseError::MissingName(whole.to_string()))?
        .to_string();
    let parent = full.parent().unwrap_or_default();
    Ok((parent, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("node:a/x", Some("a"), "x")]
    #[case("node:x", Some(""), "x")]
    #[case("leaf:a/e=hello", Some("a"), "e")]
    #[case("leaf:a/e  =hello", Some("a"), "e")]
    #[case("root:top", None, "top")]
    fn given_add_syntax_when_parsing_then_builds_add_intent(
        #[case] input: &str,
        #[case] parent: Option<&str>,
        #[case] name: &str,
    ) {
        let intent: EditIntent = input.parse().unwrap();
        match intent {
            EditIntent::AddChild { parent: p, entry } => {
                assert_eq!(p, parent.map(|s| s.parse::<NodePath>().unwrap()));
                assert_eq!(entry.name(), name);
            }
            other => panic!("unexpected intent {:?}", other),
        }
    }

    #[test]
    fn given_leaf_syntax_when_parsing_then_raw_text_is_kept() {
        let intent: EditIntent = "leaf:a/e= spaced = text ".parse().unwrap();
        assert_eq!(
            intent,
            EditIntent::AddChild {
                parent: Some(NodePath::new(["a"])),
                entry: NewEntry::Leaf {
                    name: "e".into(),
                    content: " spaced = text ".into(),
                },
            }
        );
    }

    #[rstest]
    #[case("hello ", "\"hello\"")]
    #[case("3", "\"3\"")]
    #[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
    fn given_leaf_text_when_materialized_then_stored_as_trimmed_json_string(
        #[case] text: &str,
        #[case] expected: &str,
    ) {
        let entry = NewEntry::Leaf {
            name: "e".into(),
            content: text.into(),
        }
        .to_entry(2);
        let leaf = entry.as_leaf().expect("leaf");
        assert_eq!(leaf.content(), expected);
        assert_eq!(leaf.depth(), 2);
    }

    #[test]
    fn given_rm_syntax_when_parsing_then_builds_remove_intent() {
        let intent: EditIntent = "rm:a/b".parse().unwrap();
        assert_eq!(
            intent,
            EditIntent::RemoveChild {
                target: NodePath::new(["a", "b"])
            }
        );
    }

    #[rstest]
    #[case("move:a")]
    #[case("nocolon")]
    #[case("node:")]
    #[case("node:a/ ")]
    #[case("leaf:a/e")]
    #[case("root:")]
    fn given_malformed_edit_when_parsing_then_errors(#[case] input: &str) {
        assert!(input.parse::<EditIntent>().is_err());
    }

    #[test]
    fn given_intent_when_displaying_then_round_trips_textual_form() {
        for text in ["node:a/x", "leaf:a/e=1", "root:top", "rm:d"] {
            let intent: EditIntent = text.parse().unwrap();
            assert_eq!(intent.to_string(), text);
        }
    }
}
