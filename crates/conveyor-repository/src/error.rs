//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur while locating configuration files
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No configuration file matched the request
    #[error("No configuration file found for pipeline '{pipeline_name}'.")]
    NotFound { pipeline_name: String },

    /// More than one document declares the requested pipeline name; the
    /// ambiguity is a configuration defect and is never resolved silently
    #[error("Multiple YAML files with pipeline name '{pipeline_name}' found.")]
    AmbiguousPipeline { pipeline_name: String },

    /// The repository root does not exist
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A candidate file could not be parsed as YAML
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
