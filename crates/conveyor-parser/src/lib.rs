//! conveyor-parser - location-aware YAML loader
//!
//! This crate turns raw configuration text into a generic node tree that
//! remembers where every key and element came from. Two things distinguish
//! it from plain serde deserialization: a repeated key inside any single
//! mapping is rejected immediately, and a secondary pass builds an index
//! from dotted key paths to 1-indexed (line, column) positions for use in
//! diagnostics.

pub mod document;
pub mod error;
pub mod loader;
pub mod locations;

// Re-export main types
pub use document::{Location, MappingNode, Node, Scalar, ScalarNode, SequenceNode};
pub use error::{ParseError, Result};
pub use loader::load;
pub use locations::LocationIndex;
