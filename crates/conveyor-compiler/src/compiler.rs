//! Top-level configuration compiler
//!
//! The entry point collaborators call: resolve bytes to a validated
//! pipeline in one step. The display name is only used in diagnostics.

use crate::error::{CompileError, Result};
use crate::validator::Validator;
use conveyor_core::Pipeline;
use conveyor_parser::{load, LocationIndex};

/// Facade over the loader and validator
pub struct ConfigCompiler;

impl ConfigCompiler {
    /// Load and validate a configuration document.
    ///
    /// Every call builds its own validation context, so this is safe to
    /// invoke from concurrent request handlers.
    pub fn load_and_validate(source: &str, file_name: &str) -> Result<Pipeline> {
        log::info!("starting validation of configuration file {}", file_name);
        let root = load(source).map_err(|e| CompileError::from_parse(e, file_name))?;
        let locations = LocationIndex::build(&root);
        Validator::validate(&root, locations, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_fails_before_validation() {
        let yaml = "\
default:
  name: demo
default:
  name: other
";
        let err = ConfigCompiler::load_and_validate(yaml, "pipeline.yml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "pipeline.yml:3:1: Error: Duplicate key default found in YAML file."
        );
    }

    #[test]
    fn test_end_to_end_minimal_document() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
  stage: build
  script:
    - echo hi
";
        // Only one of the four default stages is populated, so validation
        // must reject the document.
        let err = ConfigCompiler::load_and_validate(yaml, "pipeline.yml").unwrap_err();
        assert!(err.to_string().contains("has no jobs."));
    }
}
