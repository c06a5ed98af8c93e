//! Pipeline entity

use crate::entity::Stage;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The top-level validated unit of work, composed of ordered stages.
///
/// Stage order is the declared (or default) order and is the order the
/// workflow engine executes them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Persistence identifier, assigned by the collaborator layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Pipeline name, taken from the `default.name` declaration
    pub name: String,

    /// URL of the repository this pipeline was validated for
    pub repo_url: String,

    /// Stages in execution order
    pub stages: Vec<Stage>,

    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Pipeline {
    /// Create an empty pipeline with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            repo_url: String::new(),
            stages: Vec::new(),
            status: Status::default(),
            start_time: None,
            end_time: None,
        }
    }

    /// Append a stage, recording the back-reference on the stage
    pub fn add_stage(&mut self, mut stage: Stage) {
        stage.pipeline_name = self.name.clone();
        self.stages.push(stage);
    }

    /// Look up a stage by name
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_stage_sets_back_reference() {
        let mut pipeline = Pipeline::new("demo");
        pipeline.add_stage(Stage::new("build"));

        assert_eq!(pipeline.stages.len(), 1);
        assert_eq!(pipeline.stages[0].pipeline_name, "demo");
    }

    #[test]
    fn test_stage_lookup() {
        let mut pipeline = Pipeline::new("demo");
        pipeline.add_stage(Stage::new("build"));
        pipeline.add_stage(Stage::new("test"));

        assert!(pipeline.stage("test").is_some());
        assert!(pipeline.stage("deploy").is_none());
    }
}
