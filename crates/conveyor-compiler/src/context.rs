//! Per-run validation context
//!
//! One context is constructed per validation call and discarded when the
//! call returns, so concurrent validations of different documents share no
//! mutable state.

use crate::error::CompileError;
use conveyor_core::Stage;
use conveyor_parser::{Location, LocationIndex};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Mutable state accumulated while validating one document
pub struct ValidationContext {
    /// Display name used in diagnostics
    pub(crate) file_name: String,
    /// Key path to source position index for this document
    pub(crate) locations: LocationIndex,
    /// Pipeline-level default registry from `default.docker.registry`
    pub(crate) default_registry: Option<String>,
    /// Pipeline-level default image from `default.docker.image`
    pub(crate) default_image: Option<String>,
    /// Pipeline-level default artifact paths from `default.paths`
    pub(crate) default_paths: Option<Vec<String>>,
    /// Stages in declaration order
    pub(crate) stages: IndexMap<String, Stage>,
    /// Job name to stage name, for dependency resolution
    pub(crate) job_stages: HashMap<String, String>,
}

impl ValidationContext {
    pub(crate) fn new(file_name: &str, locations: LocationIndex) -> Self {
        Self {
            file_name: file_name.to_string(),
            locations,
            default_registry: None,
            default_image: None,
            default_paths: None,
            stages: IndexMap::new(),
            job_stages: HashMap::new(),
        }
    }

    /// Position of a key path, falling back to the document start for paths
    /// the index does not know (the validator only constructs paths from
    /// the same tree, so the fallback is a safety net, not a code path
    /// tests rely on)
    pub(crate) fn location(&self, path: &str) -> Location {
        self.locations.get(path).unwrap_or(Location::START)
    }

    /// Diagnostic at the position of a key path
    pub(crate) fn error(&self, path: &str, message: impl Into<String>) -> CompileError {
        self.error_at(self.location(path), message)
    }

    /// Diagnostic at an explicit position
    pub(crate) fn error_at(&self, location: Location, message: impl Into<String>) -> CompileError {
        CompileError::diagnostic(&self.file_name, location, message)
    }
}
