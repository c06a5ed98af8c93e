//! Stage entity

use crate::entity::Job;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sequential barrier grouping jobs that may run in parallel subject to
/// intra-stage dependencies.
///
/// After validation the job list holds the dependency-resolved order, not
/// the declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Stage name, unique within a pipeline
    pub name: String,

    /// Name of the owning pipeline (non-owning back-reference)
    #[serde(default)]
    pub pipeline_name: String,

    /// Jobs in dependency-resolved order
    pub jobs: Vec<Job>,

    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Stage {
    /// Create an empty stage with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            pipeline_name: String::new(),
            jobs: Vec::new(),
            status: Status::default(),
            start_time: None,
            end_time: None,
        }
    }

    /// Append a job to this stage
    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Whether the stage contains a job with the given name
    pub fn has_job(&self, job_name: &str) -> bool {
        self.jobs.iter().any(|job| job.name == job_name)
    }
}
