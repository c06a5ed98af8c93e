//! Lifecycle status shared by pipelines, stages and jobs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a pipeline, stage or job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Validated but not yet submitted
    #[default]
    Pending,
    /// Submitted to the workflow engine and running
    Running,
    /// Finished successfully
    Success,
    /// Finished with a failure
    Failed,
}

impl Status {
    /// Whether this status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Success => "success",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
