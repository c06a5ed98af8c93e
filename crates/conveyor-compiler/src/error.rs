//! Compiler error types

use conveyor_parser::{Location, ParseError};
use thiserror::Error;

/// Compiler error
///
/// Validation failures are diagnostics in the wire format
/// `<file>:<line>:<column>: <message>`; line and column are 1-indexed and
/// point at the most specific offending key. Messages carry their own
/// terminal punctuation, so the format string adds none.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A defect in the input document, located at file:line:column
    #[error("{file}:{line}:{column}: {message}")]
    Diagnostic {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// Workflow document serialization failure
    #[error("Failed to serialize workflow: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl CompileError {
    /// Build a diagnostic at the given location
    pub fn diagnostic(file: &str, location: Location, message: impl Into<String>) -> Self {
        CompileError::Diagnostic {
            file: file.to_string(),
            line: location.line,
            column: location.column,
            message: message.into(),
        }
    }

    /// Convert a loader failure into a located diagnostic
    pub fn from_parse(error: ParseError, file: &str) -> Self {
        Self::diagnostic(file, error.location(), error.to_string())
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
