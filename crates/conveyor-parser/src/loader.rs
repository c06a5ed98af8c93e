//! Event-driven document loader
//!
//! Builds the [`Node`](crate::document::Node) tree from the YAML event
//! stream rather than going through serde, because the tree must remember
//! the source position of every key and element and must reject a repeated
//! key inside any single mapping at its second occurrence.

use crate::document::{Location, MappingNode, Node, Scalar, ScalarNode, SequenceNode};
use crate::error::{ParseError, Result};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse the first YAML document of `input` into a node tree.
///
/// An empty input yields a null scalar root; the schema validator reports
/// the missing `default` section in that case.
pub fn load(input: &str) -> Result<Node> {
    let mut parser = Parser::new(input.chars());
    let mut builder = TreeBuilder::default();

    parser
        .load(&mut builder, false)
        .map_err(|e| ParseError::Syntax {
            message: e.info().to_string(),
            location: marker_location(e.marker()),
        })?;

    if let Some(error) = builder.error.take() {
        return Err(error);
    }

    log::debug!("loaded document tree ({} events consumed)", builder.events);
    Ok(builder.document.take().unwrap_or(Node::Scalar(ScalarNode {
        value: Scalar::Null,
        location: Location::START,
    })))
}

fn marker_location(marker: &Marker) -> Location {
    // Scanner lines are 1-indexed, columns 0-indexed.
    Location::new(marker.line(), marker.col() + 1)
}

/// A container node still under construction
enum Pending {
    Sequence {
        items: Vec<Node>,
        location: Location,
        anchor: usize,
    },
    Mapping {
        entries: Vec<(ScalarNode, Node)>,
        pending_key: Option<ScalarNode>,
        location: Location,
        anchor: usize,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Pending>,
    document: Option<Node>,
    anchors: HashMap<usize, Node>,
    error: Option<ParseError>,
    events: usize,
}

impl TreeBuilder {
    /// Place a completed node into its parent container, or make it the
    /// document root.
    fn insert(&mut self, node: Node, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            None => self.document = Some(node),
            Some(Pending::Sequence { items, .. }) => items.push(node),
            Some(Pending::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => {
                    let key = match node {
                        Node::Scalar(scalar) => scalar,
                        other => {
                            self.fail(ParseError::ComplexKey {
                                location: other.location(),
                            });
                            return;
                        }
                    };
                    if entries.iter().any(|(k, _)| k.value == key.value) {
                        self.fail(ParseError::DuplicateKey {
                            key: key.value.to_string(),
                            location: key.location,
                        });
                        return;
                    }
                    *pending_key = Some(key);
                }
            },
        }
    }

    fn fail(&mut self, error: ParseError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        self.events += 1;
        let location = marker_location(&marker);

        match event {
            Event::SequenceStart(anchor, _) => {
                self.stack.push(Pending::Sequence {
                    items: Vec::new(),
                    location,
                    anchor,
                });
            }
            Event::SequenceEnd => {
                if let Some(Pending::Sequence {
                    items,
                    location,
                    anchor,
                }) = self.stack.pop()
                {
                    self.insert(Node::Sequence(SequenceNode { items, location }), anchor);
                }
            }
            Event::MappingStart(anchor, _) => {
                self.stack.push(Pending::Mapping {
                    entries: Vec::new(),
                    pending_key: None,
                    location,
                    anchor,
                });
            }
            Event::MappingEnd => {
                if let Some(Pending::Mapping {
                    entries,
                    location,
                    anchor,
                    ..
                }) = self.stack.pop()
                {
                    self.insert(Node::Mapping(MappingNode { entries, location }), anchor);
                }
            }
            Event::Scalar(value, style, anchor, tag) => {
                let node = Node::Scalar(ScalarNode {
                    value: resolve_scalar(value, style, tag.as_ref()),
                    location,
                });
                self.insert(node, anchor);
            }
            Event::Alias(anchor) => match self.anchors.get(&anchor) {
                Some(node) => self.insert(node.clone(), 0),
                None => self.fail(ParseError::UnknownAnchor { location }),
            },
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
        }
    }
}

/// Resolve a scalar token against the YAML core schema.
///
/// Quoted and block scalars stay strings; explicit `!!` tags win over plain
/// resolution.
fn resolve_scalar(value: String, style: TScalarStyle, tag: Option<&Tag>) -> Scalar {
    if !matches!(style, TScalarStyle::Plain) {
        return Scalar::String(value);
    }

    if let Some(tag) = tag {
        if tag.handle == "tag:yaml.org,2002:" {
            return match tag.suffix.as_str() {
                "null" => Scalar::Null,
                "bool" => match value.parse::<bool>() {
                    Ok(b) => Scalar::Bool(b),
                    Err(_) => Scalar::String(value),
                },
                "int" => match value.parse::<i64>() {
                    Ok(i) => Scalar::Integer(i),
                    Err(_) => Scalar::String(value),
                },
                "float" => match value.parse::<f64>() {
                    Ok(x) => Scalar::Float(x),
                    Err(_) => Scalar::String(value),
                },
                _ => Scalar::String(value),
            };
        }
        return Scalar::String(value);
    }

    match value.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => Scalar::Null,
        "true" | "True" | "TRUE" => Scalar::Bool(true),
        "false" | "False" | "FALSE" => Scalar::Bool(false),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                Scalar::Integer(i)
            } else if let Ok(x) = value.parse::<f64>() {
                Scalar::Float(x)
            } else {
                Scalar::String(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_simple_mapping() {
        let yaml = "name: demo\ncount: 3\nenabled: true\n";
        let root = load(yaml).unwrap();
        let mapping = root.as_mapping().unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get("name").unwrap().as_str(), Some("demo"));
        assert_eq!(mapping.get("enabled").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_load_tracks_key_locations() {
        let yaml = "default:\n  name: demo\nstages:\n  - build\n";
        let root = load(yaml).unwrap();
        let mapping = root.as_mapping().unwrap();

        let (default_key, _) = &mapping.entries[0];
        assert_eq!(default_key.location, Location::new(1, 1));
        let (stages_key, stages_value) = &mapping.entries[1];
        assert_eq!(stages_key.location, Location::new(3, 1));
        let items = &stages_value.as_sequence().unwrap().items;
        assert_eq!(items[0].location(), Location::new(4, 5));
    }

    #[test]
    fn test_duplicate_key_cites_second_occurrence() {
        let yaml = "build:\n  stage: build\nbuild:\n  stage: test\n";
        let err = load(yaml).unwrap_err();

        match err {
            ParseError::DuplicateKey { key, location } => {
                assert_eq!(key, "build");
                assert_eq!(location, Location::new(3, 1));
            }
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key_in_nested_mapping() {
        let yaml = "job:\n  docker:\n    image: a\n    image: b\n";
        let err = load(yaml).unwrap_err();

        match err {
            ParseError::DuplicateKey { key, location } => {
                assert_eq!(key, "image");
                assert_eq!(location.line, 4);
            }
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_key_in_sibling_mappings_is_allowed() {
        let yaml = "a:\n  stage: build\nb:\n  stage: build\n";
        assert!(load(yaml).is_ok());
    }

    #[test]
    fn test_empty_document_yields_null_root() {
        let root = load("").unwrap();
        assert!(root.is_null());
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let yaml = "a: \"true\"\nb: '42'\nc: 42\n";
        let root = load(yaml).unwrap();
        let mapping = root.as_mapping().unwrap();

        assert_eq!(mapping.get("a").unwrap().as_str(), Some("true"));
        assert_eq!(mapping.get("b").unwrap().as_str(), Some("42"));
        assert_eq!(mapping.get("c").unwrap().kind(), "integer");
    }

    #[test]
    fn test_anchor_and_alias_resolution() {
        let yaml = "base: &img busybox\nother: *img\n";
        let root = load(yaml).unwrap();
        let mapping = root.as_mapping().unwrap();

        assert_eq!(mapping.get("other").unwrap().as_str(), Some("busybox"));
    }

    #[test]
    fn test_malformed_yaml_is_a_syntax_error() {
        let yaml = "a: [1, 2\n";
        let err = load(yaml).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }
}
