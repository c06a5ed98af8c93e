//! Parser error types

use crate::document::Location;
use thiserror::Error;

/// Loader error
///
/// Every variant carries the source position of the offending token so the
/// caller can format a `file:line:column` diagnostic.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The same key appears twice in one mapping; the location is the
    /// second occurrence
    #[error("Error: Duplicate key {key} found in YAML file.")]
    DuplicateKey { key: String, location: Location },

    /// Malformed YAML reported by the scanner
    #[error("{message}")]
    Syntax { message: String, location: Location },

    /// A mapping key that is itself a collection
    #[error("Mapping key at {location} is not a scalar.")]
    ComplexKey { location: Location },

    /// An alias referencing an anchor that was never defined
    #[error("Unknown anchor referenced at {location}.")]
    UnknownAnchor { location: Location },
}

impl ParseError {
    /// Source position of the failure
    pub fn location(&self) -> Location {
        match self {
            ParseError::DuplicateKey { location, .. }
            | ParseError::Syntax { location, .. }
            | ParseError::ComplexKey { location }
            | ParseError::UnknownAnchor { location } => *location,
        }
    }
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, ParseError>;
