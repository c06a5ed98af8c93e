//! Unit tests for the domain entities
//!
//! Tests the core data structures shared across the conveyor crates.

use conveyor_core::constants::{DEFAULT_STAGES, DOCKERHUB_REGISTRY};
use conveyor_core::{Job, Pipeline, Stage, Status};

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_pipeline_owns_stages_in_insertion_order() {
    let mut pipeline = Pipeline::new("ci");
    for name in DEFAULT_STAGES {
        pipeline.add_stage(Stage::new(*name));
    }

    let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["build", "test", "doc", "deploy"]);
}

#[test]
fn test_pipeline_starts_pending_with_no_timestamps() {
    let pipeline = Pipeline::new("ci");

    assert_eq!(pipeline.status, Status::Pending);
    assert!(pipeline.start_time.is_none());
    assert!(pipeline.end_time.is_none());
}

#[test]
fn test_back_references_are_names_not_links() {
    let mut pipeline = Pipeline::new("ci");
    let mut stage = Stage::new("build");
    stage.add_job(Job::new("compile", "build"));
    pipeline.add_stage(stage);

    // Equality over the whole tree terminates because back-references are
    // plain strings.
    let clone = pipeline.clone();
    assert_eq!(pipeline, clone);
    assert_eq!(pipeline.stages[0].jobs[0].stage_name, "build");
    assert_eq!(pipeline.stages[0].pipeline_name, "ci");
}

// =============================================================================
// Job Tests
// =============================================================================

#[test]
fn test_job_serialization_roundtrip() -> anyhow::Result<()> {
    let mut job = Job::new("compile", "build");
    job.scripts = vec!["make".to_string()];
    job.registry = DOCKERHUB_REGISTRY.to_string();
    job.image_name = "gcc:13".to_string();

    let json = serde_json::to_string(&job)?;
    let back: Job = serde_json::from_str(&json)?;
    assert_eq!(job, back);
    Ok(())
}

#[test]
fn test_stage_has_job_lookup() {
    let mut stage = Stage::new("test");
    stage.add_job(Job::new("unit", "test"));
    stage.add_job(Job::new("lint", "test"));

    assert!(stage.has_job("unit"));
    assert!(stage.has_job("lint"));
    assert!(!stage.has_job("integration"));
}
