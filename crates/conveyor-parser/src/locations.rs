//! Key-path location index
//!
//! Walks a loaded document tree and records the source position of every
//! mapping key and sequence element under its dotted key path. Sequence
//! elements use their 0-based index as the path segment, so the second
//! stage in `stages: [build, test]` is addressed as `stages.1`.

use crate::document::{Location, Node};
use std::collections::HashMap;

/// Mapping from dotted key paths to 1-indexed source positions
#[derive(Debug, Default)]
pub struct LocationIndex {
    map: HashMap<String, Location>,
}

impl LocationIndex {
    /// Index every key path in the tree
    pub fn build(root: &Node) -> Self {
        let mut index = LocationIndex::default();
        index.extract(root, "");
        log::debug!("indexed {} key paths", index.map.len());
        index
    }

    fn extract(&mut self, node: &Node, path: &str) {
        match node {
            Node::Mapping(mapping) => {
                for (key, value) in mapping.iter() {
                    let Some(segment) = key.as_segment() else {
                        // Null keys have no path; the validator reports them
                        // from the key node itself.
                        continue;
                    };
                    let current = if path.is_empty() {
                        segment
                    } else {
                        format!("{}.{}", path, segment)
                    };
                    self.map.insert(current.clone(), key.location);
                    self.extract(value, &current);
                }
            }
            Node::Sequence(sequence) => {
                for (i, item) in sequence.items.iter().enumerate() {
                    let current = format!("{}.{}", path, i);
                    self.map.insert(current.clone(), item.location());
                    self.extract(item, &current);
                }
            }
            Node::Scalar(_) => {}
        }
    }

    /// Look up a key path; paths not produced by [`build`](Self::build) on
    /// the same tree return `None`
    pub fn get(&self, path: &str) -> Option<Location> {
        self.map.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
