//! Job entity

use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single unit of script execution with a resolved container image and
/// optional same-stage dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Job name, unique within a pipeline; also the dependency-reference key
    pub name: String,

    /// Name of the stage this job belongs to, set once at validation time
    pub stage_name: String,

    /// Script lines executed by the job, in order (never empty)
    pub scripts: Vec<String>,

    /// Names of same-stage jobs that must complete before this one
    pub needs: Vec<String>,

    /// Resolved container registry
    pub registry: String,

    /// Resolved container image (never empty after validation)
    pub image_name: String,

    /// Artifact paths uploaded on completion, possibly inherited
    pub paths: Vec<String>,

    /// Whether the pipeline tolerates this job failing
    pub allow_failure: bool,

    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a job with the given name, attached to the given stage
    pub fn new(name: impl Into<String>, stage_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            stage_name: stage_name.into(),
            scripts: Vec::new(),
            needs: Vec::new(),
            registry: String::new(),
            image_name: String::new(),
            paths: Vec::new(),
            allow_failure: false,
            status: Status::default(),
            start_time: None,
            completion_time: None,
        }
    }
}
