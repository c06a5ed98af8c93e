//! Generic document tree
//!
//! YAML documents are modeled as a tagged tree of mapping, sequence and
//! scalar nodes. Every node carries the 1-indexed source position of the
//! token that introduced it, which is what makes precise diagnostics
//! possible later in the pipeline.

use std::fmt;

/// A 1-indexed source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// The start of the document
    pub const START: Location = Location { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A resolved scalar value
///
/// Plain scalars are resolved against the YAML core schema (null, boolean,
/// integer, float), everything else stays a string.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Kind name used in type-mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A scalar node with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub value: Scalar,
    pub location: Location,
}

impl ScalarNode {
    /// The path segment this node contributes when used as a mapping key,
    /// or `None` for a null key
    pub fn as_segment(&self) -> Option<String> {
        if self.value.is_null() {
            None
        } else {
            Some(self.value.to_string())
        }
    }
}

/// A sequence node with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNode {
    pub items: Vec<Node>,
    pub location: Location,
}

/// A mapping node preserving entry insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct MappingNode {
    pub entries: Vec<(ScalarNode, Node)>,
    pub location: Location,
}

impl MappingNode {
    /// Look up the value for a string key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k.value.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = &(ScalarNode, Node)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(ScalarNode),
    Sequence(SequenceNode),
    Mapping(MappingNode),
}

impl Node {
    pub fn location(&self) -> Location {
        match self {
            Node::Scalar(n) => n.location,
            Node::Sequence(n) => n.location,
            Node::Mapping(n) => n.location,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingNode> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(n) => n.value.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(n) => n.value.as_bool(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(n) if n.value.is_null())
    }

    /// Kind name used in type-mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(n) => n.value.kind(),
            Node::Sequence(_) => "list",
            Node::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(n) => write!(f, "{}", n.value),
            Node::Sequence(s) => {
                f.write_str("[")?;
                for (i, item) in s.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Mapping(m) => {
                f.write_str("{")?;
                for (i, (key, value)) in m.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key.value, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(value: Scalar) -> Node {
        Node::Scalar(ScalarNode {
            value,
            location: Location::START,
        })
    }

    #[test]
    fn test_mapping_lookup_preserves_order() {
        let mapping = MappingNode {
            entries: vec![
                (
                    ScalarNode {
                        value: Scalar::String("b".to_string()),
                        location: Location::new(1, 1),
                    },
                    scalar(Scalar::Integer(2)),
                ),
                (
                    ScalarNode {
                        value: Scalar::String("a".to_string()),
                        location: Location::new(2, 1),
                    },
                    scalar(Scalar::Integer(1)),
                ),
            ],
            location: Location::START,
        };

        let keys: Vec<_> = mapping
            .iter()
            .map(|(k, _)| k.value.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(mapping.contains_key("a"));
        assert!(!mapping.contains_key("c"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(scalar(Scalar::Null).kind(), "null");
        assert_eq!(scalar(Scalar::Bool(true)).kind(), "boolean");
        assert_eq!(scalar(Scalar::String("x".to_string())).kind(), "string");
        let seq = Node::Sequence(SequenceNode {
            items: vec![],
            location: Location::START,
        });
        assert_eq!(seq.kind(), "list");
    }

    #[test]
    fn test_display_renders_scalars_plainly() {
        assert_eq!(scalar(Scalar::Bool(false)).to_string(), "false");
        assert_eq!(
            scalar(Scalar::String("echo hi".to_string())).to_string(),
            "echo hi"
        );
        let seq = Node::Sequence(SequenceNode {
            items: vec![scalar(Scalar::Integer(1)), scalar(Scalar::Integer(2))],
            location: Location::START,
        });
        assert_eq!(seq.to_string(), "[1, 2]");
    }
}
