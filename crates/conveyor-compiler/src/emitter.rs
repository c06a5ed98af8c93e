//! Workflow emitter
//!
//! Converts a validated pipeline into the two-level workflow DAG. The
//! emitter performs no validation; its input already satisfies the
//! validator and resolver invariants. The only non-deterministic input is
//! the freshly generated workflow name suffix, so emitting the same
//! pipeline twice yields identical topology under different names.

use crate::error::Result;
use crate::workflow::{
    Arguments, Container, Dag, DagTask, Inputs, Metadata, Parameter, Template, Workflow,
    WorkflowSpec,
};
use conveyor_core::{Job, Pipeline, Stage};
use uuid::Uuid;

const API_VERSION: &str = "argoproj.io/v1alpha1";
const KIND: &str = "Workflow";
const ENTRYPOINT: &str = "pipeline";
const SCRIPT_PARAMETER: &str = "script";

/// An emitted workflow document, ready for submission
#[derive(Debug, Clone)]
pub struct EmittedWorkflow {
    /// Serialized workflow document
    pub yaml: String,
    /// Unique name under which the engine will know this run
    pub workflow_name: String,
}

/// Workflow emitter entry point
pub struct WorkflowEmitter;

impl WorkflowEmitter {
    /// Build the workflow graph for a validated pipeline
    pub fn emit(pipeline: &Pipeline) -> Workflow {
        let workflow_name = format!("pipeline-{}-{}", pipeline.name, Uuid::new_v4());
        log::debug!("emitting workflow '{}'", workflow_name);

        let mut templates = Vec::with_capacity(1 + 2 * pipeline.stages.len());
        templates.push(Template {
            name: ENTRYPOINT.to_string(),
            dag: Some(stage_dag(pipeline)),
            inputs: None,
            container: None,
        });
        for stage in &pipeline.stages {
            templates.push(stage_template(stage));
        }
        for stage in &pipeline.stages {
            for job in &stage.jobs {
                templates.push(job_template(job));
            }
        }

        Workflow {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata {
                name: workflow_name,
            },
            spec: WorkflowSpec {
                entrypoint: ENTRYPOINT.to_string(),
                templates,
            },
        }
    }

    /// Emit and serialize the workflow document
    pub fn emit_yaml(pipeline: &Pipeline) -> Result<EmittedWorkflow> {
        let workflow = Self::emit(pipeline);
        let yaml = serde_yaml::to_string(&workflow)?;
        log::info!(
            "workflow '{}' emitted ({} templates)",
            workflow.metadata.name,
            workflow.spec.templates.len()
        );
        Ok(EmittedWorkflow {
            yaml,
            workflow_name: workflow.metadata.name,
        })
    }
}

/// Root DAG: one task per stage, each depending on the previous one so the
/// stages run strictly in sequence.
fn stage_dag(pipeline: &Pipeline) -> Dag {
    let mut tasks = Vec::with_capacity(pipeline.stages.len());
    for (i, stage) in pipeline.stages.iter().enumerate() {
        tasks.push(DagTask {
            name: stage.name.clone(),
            template: format!("{}-dag", stage.name),
            dependencies: if i > 0 {
                Some(vec![pipeline.stages[i - 1].name.clone()])
            } else {
                None
            },
            arguments: None,
        });
    }
    Dag { tasks }
}

/// Per-stage DAG template: one task per job, in the resolver's level order,
/// with intra-stage dependency edges from `needs`.
fn stage_template(stage: &Stage) -> Template {
    let tasks = stage.jobs.iter().map(job_task).collect();
    Template {
        name: format!("{}-dag", stage.name),
        dag: Some(Dag { tasks }),
        inputs: None,
        container: None,
    }
}

fn job_task(job: &Job) -> DagTask {
    DagTask {
        name: job.name.clone(),
        template: format!("{}-template", job.name),
        dependencies: if job.needs.is_empty() {
            None
        } else {
            Some(job.needs.clone())
        },
        arguments: Some(Arguments {
            parameters: vec![Parameter {
                name: SCRIPT_PARAMETER.to_string(),
                value: Some(job.scripts.join("\n")),
            }],
        }),
    }
}

/// Per-job template: one `script` input parameter executed verbatim by a
/// shell in the job's resolved image.
fn job_template(job: &Job) -> Template {
    Template {
        name: format!("{}-template", job.name),
        dag: None,
        inputs: Some(Inputs {
            parameters: vec![Parameter {
                name: SCRIPT_PARAMETER.to_string(),
                value: None,
            }],
        }),
        container: Some(Container {
            image: job.image_name.clone(),
            command: vec!["sh".to_string(), "-c".to_string()],
            args: vec!["{{inputs.parameters.script}}".to_string()],
        }),
    }
}
