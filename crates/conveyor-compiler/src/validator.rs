//! Schema validator
//!
//! Consumes the loaded document tree plus its location index and produces
//! the validated [`Pipeline`]. Validation is all-or-nothing: the first
//! violation stops the run and is reported at the most specific key path
//! available, falling back to the job's own name, falling back to the
//! document start.
//!
//! The walk mirrors the file structure: declaration keys first (`default`,
//! `stages`, `include`, `workflow`), then every remaining top-level entry
//! as a job.

use crate::context::ValidationContext;
use crate::error::Result;
use crate::resolver;
use conveyor_core::constants::*;
use conveyor_core::{Job, Pipeline, Stage};
use conveyor_parser::{Location, LocationIndex, MappingNode, Node};

/// Schema validator entry point
pub struct Validator;

impl Validator {
    /// Validate a loaded document tree into a pipeline.
    ///
    /// `file_name` is only used in diagnostics. A fresh context is built
    /// for every call, so concurrent validations are independent.
    pub fn validate(root: &Node, locations: LocationIndex, file_name: &str) -> Result<Pipeline> {
        let mut ctx = ValidationContext::new(file_name, locations);

        let Some(config) = root.as_mapping() else {
            return Err(ctx.error_at(Location::START, "Default section is not found."));
        };
        if !config.contains_key(NON_JOB_KEY_DEFAULT) {
            log::error!("{}: default section is missing", file_name);
            return Err(ctx.error_at(Location::START, "Default section is not found."));
        }

        parse_stages(&mut ctx, config)?;
        log::debug!("{}: parsed {} stages", file_name, ctx.stages.len());

        // 1st pass: declaration entries
        let mut pipeline_name = String::new();
        for (key, value) in config.iter() {
            let Some(name) = key.as_segment() else {
                return Err(ctx.error_at(key.location, "Null key in config file."));
            };
            if value.is_null() {
                return Err(ctx.error_at(
                    key.location,
                    format!("Cannot find value in Config File for key '{}'", name),
                ));
            }
            if NON_JOB_KEYS.contains(&name.as_str()) {
                if name == STAGES_KEY {
                    continue; // already consumed
                }
                if name == NON_JOB_KEY_DEFAULT {
                    pipeline_name = handle_default(&mut ctx, value)?;
                } else {
                    log::debug!("{}: skipping declaration entry '{}'", file_name, name);
                }
            }
        }

        // 2nd pass: everything else is a job
        for (key, value) in config.iter() {
            let Some(name) = key.as_segment() else {
                continue; // rejected in the first pass
            };
            if NON_JOB_KEYS.contains(&name.as_str()) {
                continue;
            }
            let job_config = check_mapping(&ctx, value, &name, &name)?;
            let job = handle_job_entry(&mut ctx, &name, key.location, job_config)?;
            ctx.job_stages
                .insert(job.name.clone(), job.stage_name.clone());
            if let Some(stage) = ctx.stages.get_mut(&job.stage_name) {
                stage.add_job(job);
            }
            log::debug!("{}: job '{}' validated", file_name, name);
        }

        // Every stage must have ended up with at least one job
        for stage in ctx.stages.values() {
            if stage.jobs.is_empty() {
                log::error!("{}: stage '{}' has no jobs", file_name, stage.name);
                return Err(
                    ctx.error_at(Location::START, format!("Stage {} has no jobs.", stage.name))
                );
            }
        }

        // Order jobs within each stage, then assemble the pipeline in
        // stage-declaration order
        let mut pipeline = Pipeline::new(pipeline_name);
        let stages = std::mem::take(&mut ctx.stages);
        for (_, mut stage) in stages {
            let jobs = std::mem::take(&mut stage.jobs);
            stage.jobs = resolver::order(jobs, &ctx)?;
            pipeline.add_stage(stage);
        }

        log::info!(
            "{}: pipeline '{}' validated with {} stages",
            file_name,
            pipeline.name,
            pipeline.stages.len()
        );
        Ok(pipeline)
    }
}

/// Install the declared stage list, or the default one when the file
/// declares none (or an empty list). Stage names must be unique.
fn parse_stages(ctx: &mut ValidationContext, config: &MappingNode) -> Result<()> {
    let declared = match config.get(STAGES_KEY) {
        None => None,
        Some(node) if node.is_null() => None,
        Some(node) => {
            let sequence = match node.as_sequence() {
                Some(s) => s,
                None => return Err(wrong_type(ctx, node, STAGES_KEY, STAGES_KEY, "list")),
            };
            if sequence.items.is_empty() {
                None
            } else {
                Some(sequence)
            }
        }
    };

    let Some(sequence) = declared else {
        for name in DEFAULT_STAGES {
            ctx.stages.insert(name.to_string(), Stage::new(*name));
        }
        return Ok(());
    };

    for (i, item) in sequence.items.iter().enumerate() {
        let Some(name) = item.as_str() else {
            return Err(ctx.error(
                STAGES_KEY,
                format!(
                    "List for key {} contains an item of incorrect type. \
                     Expected string, but found {} with value: {}",
                    STAGES_KEY,
                    item.kind(),
                    item
                ),
            ));
        };
        if ctx.stages.contains_key(name) {
            let path = format!("{}.{}", STAGES_KEY, i);
            return Err(ctx.error(&path, format!("Duplicate stage name {}", name)));
        }
        ctx.stages.insert(name.to_string(), Stage::new(name));
    }
    Ok(())
}

/// Process the `default` section: pipeline name, inheritable docker
/// settings and default artifact paths. Returns the pipeline name.
fn handle_default(ctx: &mut ValidationContext, value: &Node) -> Result<String> {
    let section = check_mapping(ctx, value, NON_JOB_KEY_DEFAULT, NON_JOB_KEY_DEFAULT)?;

    let name = match section.get(DEFAULT_KEY_NAME) {
        None => {
            return Err(ctx.error(NON_JOB_KEY_DEFAULT, "Pipeline name is not defined."));
        }
        Some(node) if node.is_null() => {
            return Err(ctx.error(NON_JOB_KEY_DEFAULT, "Pipeline name is not defined."));
        }
        Some(node) => {
            let path = format!("{}.{}", NON_JOB_KEY_DEFAULT, DEFAULT_KEY_NAME);
            check_string(ctx, node, DEFAULT_KEY_NAME, &path)?
        }
    };
    log::info!("pipeline name set to '{}'", name);

    if let Some(docker) = section.get(DEFAULT_KEY_DOCKER) {
        let docker_path = format!("{}.{}", NON_JOB_KEY_DEFAULT, DEFAULT_KEY_DOCKER);
        let docker = check_mapping(ctx, docker, DEFAULT_KEY_DOCKER, &docker_path)?;

        if let Some(registry) = docker.get(DEFAULT_KEY_DOCKER_REGISTRY) {
            if !registry.is_null() {
                let path = format!("{}.{}", docker_path, DEFAULT_KEY_DOCKER_REGISTRY);
                ctx.default_registry =
                    Some(check_string(ctx, registry, DEFAULT_KEY_DOCKER_REGISTRY, &path)?);
            }
        }
        if let Some(image) = docker.get(DEFAULT_KEY_DOCKER_IMAGE) {
            if !image.is_null() {
                let path = format!("{}.{}", docker_path, DEFAULT_KEY_DOCKER_IMAGE);
                ctx.default_image =
                    Some(check_string(ctx, image, DEFAULT_KEY_DOCKER_IMAGE, &path)?);
            }
        }
    }

    if let Some(paths) = section.get(DEFAULT_KEY_PATHS) {
        if !paths.is_null() {
            let path = format!("{}.{}", NON_JOB_KEY_DEFAULT, DEFAULT_KEY_PATHS);
            ctx.default_paths = Some(check_string_list(ctx, paths, DEFAULT_KEY_PATHS, &path)?);
        }
    }

    Ok(name)
}

/// Validate one job entry and build the [`Job`].
fn handle_job_entry(
    ctx: &mut ValidationContext,
    job_name: &str,
    job_location: Location,
    config: &MappingNode,
) -> Result<Job> {
    if !config.contains_key(JOB_KEY_SCRIPT) {
        log::error!("job '{}' has no script", job_name);
        return Err(ctx.error_at(job_location, format!("Job {} has no script.", job_name)));
    }
    if !config.contains_key(JOB_KEY_STAGE) {
        log::error!("job '{}' has no stage", job_name);
        return Err(ctx.error_at(job_location, format!("Job {} has no stage.", job_name)));
    }

    // Without a docker section the job must be able to inherit an image;
    // inheriting an image with no declared registry assumes the public one.
    if !config.contains_key(JOB_KEY_DOCKER) {
        if ctx.default_image.is_none() {
            return Err(ctx.error_at(
                job_location,
                format!("Docker image not found for Job {}.", job_name),
            ));
        }
        if ctx.default_registry.is_none() {
            ctx.default_registry = Some(DOCKERHUB_REGISTRY.to_string());
        }
    }

    let mut scripts = Vec::new();
    let mut needs = Vec::new();
    let mut stage_name: Option<String> = None;
    let mut job_registry: Option<String> = None;
    let mut job_image: Option<String> = None;
    let mut allow_failure = false;
    let mut paths = ctx.default_paths.clone().unwrap_or_default();

    for (key, value) in config.iter() {
        let Some(field) = key.as_segment() else {
            return Err(ctx.error_at(key.location, "Null key in config file."));
        };
        match field.as_str() {
            JOB_KEY_STAGE => {
                let path = format!("{}.{}", job_name, JOB_KEY_STAGE);
                let stage = check_string(ctx, value, JOB_KEY_STAGE, &path)?;
                if !ctx.stages.contains_key(&stage) {
                    log::error!("job '{}' references undeclared stage '{}'", job_name, stage);
                    return Err(
                        ctx.error(&path, format!("Stage name {} is not declared.", stage))
                    );
                }
                stage_name = Some(stage);
            }
            JOB_KEY_SCRIPT => {
                let path = format!("{}.{}", job_name, JOB_KEY_SCRIPT);
                scripts = check_string_list(ctx, value, JOB_KEY_SCRIPT, &path)?;
            }
            JOB_KEY_NEEDS => {
                let path = format!("{}.{}", job_name, JOB_KEY_NEEDS);
                needs = check_string_list(ctx, value, JOB_KEY_NEEDS, &path)?;
            }
            JOB_KEY_DOCKER => {
                let (registry, image) = handle_docker(ctx, job_name, value)?;
                job_registry = registry;
                job_image = image;
            }
            JOB_KEY_ALLOW_FAILURE => {
                let path = format!("{}.{}", job_name, JOB_KEY_ALLOW_FAILURE);
                allow_failure = check_bool(ctx, value, JOB_KEY_ALLOW_FAILURE, &path)?;
            }
            JOB_KEY_ARTIFACTS => {
                let job_paths = handle_artifact(ctx, job_name, value)?;
                if !job_paths.is_empty() {
                    paths = job_paths;
                }
            }
            _ => {}
        }
    }

    // Resolution order: job-level value, then pipeline default, then the
    // public registry (images have no final fallback).
    let registry = job_registry
        .or_else(|| ctx.default_registry.clone())
        .unwrap_or_else(|| DOCKERHUB_REGISTRY.to_string());
    let image_name = match job_image.or_else(|| ctx.default_image.clone()) {
        Some(image) => image,
        None => {
            log::error!("no image provided or inherited for job '{}'", job_name);
            return Err(ctx.error_at(
                job_location,
                format!("Docker image not found for Job {}.", job_name),
            ));
        }
    };
    let stage_name = match stage_name {
        Some(stage) => stage,
        None => {
            return Err(ctx.error_at(job_location, format!("Job {} has no stage.", job_name)));
        }
    };

    let mut job = Job::new(job_name, stage_name);
    job.scripts = scripts;
    job.needs = needs;
    job.registry = registry;
    job.image_name = image_name;
    job.paths = paths;
    job.allow_failure = allow_failure;
    Ok(job)
}

/// Extract the optional registry/image overrides from a job's `docker`
/// section.
fn handle_docker(
    ctx: &ValidationContext,
    job_name: &str,
    value: &Node,
) -> Result<(Option<String>, Option<String>)> {
    let docker_path = format!("{}.{}", job_name, JOB_KEY_DOCKER);
    let docker = check_mapping(ctx, value, JOB_KEY_DOCKER, &docker_path)?;

    let mut registry = None;
    let mut image = None;
    if let Some(node) = docker.get(JOB_KEY_DOCKER_REGISTRY) {
        let path = format!("{}.{}", docker_path, JOB_KEY_DOCKER_REGISTRY);
        registry = Some(check_string(ctx, node, JOB_KEY_DOCKER_REGISTRY, &path)?);
    }
    if let Some(node) = docker.get(JOB_KEY_DOCKER_IMAGE) {
        let path = format!("{}.{}", docker_path, JOB_KEY_DOCKER_IMAGE);
        image = Some(check_string(ctx, node, JOB_KEY_DOCKER_IMAGE, &path)?);
    }
    Ok((registry, image))
}

/// Extract the artifact paths from a job's `artifacts` section. An absent
/// `paths` key yields an empty list, which leaves the inherited defaults
/// in place.
fn handle_artifact(ctx: &ValidationContext, job_name: &str, value: &Node) -> Result<Vec<String>> {
    let artifacts_path = format!("{}.{}", job_name, JOB_KEY_ARTIFACTS);
    let artifacts = check_mapping(ctx, value, JOB_KEY_ARTIFACTS, &artifacts_path)?;

    match artifacts.get(JOB_KEY_PATHS) {
        None => Ok(Vec::new()),
        Some(node) => {
            let path = format!("{}.{}", artifacts_path, JOB_KEY_PATHS);
            check_string_list(ctx, node, JOB_KEY_PATHS, &path)
        }
    }
}

fn wrong_type(
    ctx: &ValidationContext,
    node: &Node,
    key: &str,
    path: &str,
    expected: &str,
) -> crate::error::CompileError {
    if node.is_null() {
        ctx.error(
            path,
            format!("The value in key {} is null, expected a {}.", key, expected),
        )
    } else {
        ctx.error(
            path,
            format!(
                "Wrong type for value in key {}. Expected a {}, but found {} with value: {}.",
                key,
                expected,
                node.kind(),
                node
            ),
        )
    }
}

fn check_mapping<'a>(
    ctx: &ValidationContext,
    node: &'a Node,
    key: &str,
    path: &str,
) -> Result<&'a MappingNode> {
    node.as_mapping()
        .ok_or_else(|| wrong_type(ctx, node, key, path, "mapping"))
}

fn check_string(ctx: &ValidationContext, node: &Node, key: &str, path: &str) -> Result<String> {
    node.as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(ctx, node, key, path, "string"))
}

fn check_bool(ctx: &ValidationContext, node: &Node, key: &str, path: &str) -> Result<bool> {
    node.as_bool()
        .ok_or_else(|| wrong_type(ctx, node, key, path, "boolean"))
}

/// A declared list field must be a non-empty list of strings.
fn check_string_list(
    ctx: &ValidationContext,
    node: &Node,
    key: &str,
    path: &str,
) -> Result<Vec<String>> {
    let sequence = node
        .as_sequence()
        .ok_or_else(|| wrong_type(ctx, node, key, path, "list"))?;
    if sequence.items.is_empty() {
        return Err(ctx.error(path, format!("List for key {} is empty.", key)));
    }

    let mut values = Vec::with_capacity(sequence.items.len());
    for item in &sequence.items {
        let Some(value) = item.as_str() else {
            return Err(ctx.error(
                path,
                format!(
                    "List for key {} contains an item of incorrect type. \
                     Expected string, but found {} with value: {}",
                    key,
                    item.kind(),
                    item
                ),
            ));
        };
        values.push(value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_parser::{load, LocationIndex};

    fn validate(yaml: &str) -> Result<Pipeline> {
        let root = load(yaml).unwrap();
        let locations = LocationIndex::build(&root);
        Validator::validate(&root, locations, "pipeline.yml")
    }

    #[test]
    fn test_missing_default_section_fails_at_origin() {
        let err = validate("build:\n  stage: build\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "pipeline.yml:1:1: Default section is not found."
        );
    }

    #[test]
    fn test_empty_document_fails_like_missing_default() {
        let err = validate("").unwrap_err();
        assert!(err.to_string().contains("Default section is not found."));
    }

    #[test]
    fn test_minimal_pipeline_gets_default_stages() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
  stage: build
  script:
    - echo hi
test-job:
  stage: test
  script:
    - echo test
doc-job:
  stage: doc
  script:
    - echo doc
deploy-job:
  stage: deploy
  script:
    - echo deploy
";
        let pipeline = validate(yaml).unwrap();
        assert_eq!(pipeline.name, "demo");
        let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["build", "test", "doc", "deploy"]);
    }

    #[test]
    fn test_missing_pipeline_name() {
        let yaml = "\
default:
  docker:
    image: busybox
build:
  stage: build
  script: [make]
";
        let err = validate(yaml).unwrap_err();
        assert!(err.to_string().contains("Pipeline name is not defined."));
    }

    #[test]
    fn test_duplicate_stage_name_cites_duplicate_element() {
        let yaml = "\
default:
  name: demo
stages:
  - build
  - build
";
        let err = validate(yaml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Duplicate stage name build"), "{}", message);
        // second element of the stages list
        assert!(message.starts_with("pipeline.yml:5:"), "{}", message);
    }

    #[test]
    fn test_job_without_script() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
  stage: build
";
        let err = validate(yaml).unwrap_err();
        assert!(err.to_string().contains("Job build has no script."));
    }

    #[test]
    fn test_job_without_stage() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
  script: [make]
";
        let err = validate(yaml).unwrap_err();
        assert!(err.to_string().contains("Job build has no stage."));
    }

    #[test]
    fn test_undeclared_stage_reference() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
  stage: release
  script: [make]
";
        let err = validate(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("Stage name release is not declared."));
    }

    #[test]
    fn test_job_without_docker_and_no_default_image() {
        let yaml = "\
default:
  name: demo
build:
  stage: build
  script: [make]
";
        let err = validate(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("Docker image not found for Job build."));
    }

    #[test]
    fn test_image_inheritance_and_public_registry_fallback() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages:
  - build
build:
  stage: build
  script:
    - echo hi
";
        let pipeline = validate(yaml).unwrap();
        let job = &pipeline.stages[0].jobs[0];
        assert_eq!(job.image_name, "busybox");
        assert_eq!(job.registry, "docker.io");
    }

    #[test]
    fn test_job_docker_overrides_defaults() {
        let yaml = "\
default:
  name: demo
  docker:
    registry: registry.example.com
    image: busybox
stages: [build]
build:
  stage: build
  script: [make]
  docker:
    image: gcc:13
";
        let pipeline = validate(yaml).unwrap();
        let job = &pipeline.stages[0].jobs[0];
        assert_eq!(job.image_name, "gcc:13");
        // default registry still applies when the job overrides only the image
        assert_eq!(job.registry, "registry.example.com");
    }

    #[test]
    fn test_artifact_paths_inherit_and_override() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
  paths:
    - dist/
stages: [build, test]
build:
  stage: build
  script: [make]
test:
  stage: test
  script: [make check]
  artifacts:
    paths:
      - reports/
";
        let pipeline = validate(yaml).unwrap();
        assert_eq!(pipeline.stages[0].jobs[0].paths, vec!["dist/"]);
        assert_eq!(pipeline.stages[1].jobs[0].paths, vec!["reports/"]);
    }

    #[test]
    fn test_empty_script_list_is_rejected() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages: [build]
build:
  stage: build
  script: []
";
        let err = validate(yaml).unwrap_err();
        assert!(err.to_string().contains("List for key script is empty."));
    }

    #[test]
    fn test_wrong_script_element_type() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages: [build]
build:
  stage: build
  script:
    - make
    - 42
";
        let err = validate(yaml).unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("List for key script contains an item of incorrect type."),
            "{}",
            message
        );
        assert!(message.contains("found integer with value: 42"), "{}", message);
    }

    #[test]
    fn test_allow_failure_must_be_boolean() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages: [build]
build:
  stage: build
  script: [make]
  allow_failure: please
";
        let err = validate(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("Wrong type for value in key allow_failure."));
    }

    #[test]
    fn test_null_top_level_value_is_rejected() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
build:
";
        let err = validate(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("Cannot find value in Config File for key 'build'"));
    }

    #[test]
    fn test_stage_with_no_jobs_is_invalid() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages:
  - build
  - test
build:
  stage: build
  script: [make]
";
        let err = validate(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pipeline.yml:1:1: Stage test has no jobs."
        );
    }

    #[test]
    fn test_include_and_workflow_keys_are_tolerated() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
include: [other.yml]
workflow: {rules: []}
stages: [build]
build:
  stage: build
  script: [make]
";
        assert!(validate(yaml).is_ok());
    }

    #[test]
    fn test_empty_stages_list_installs_defaults() {
        let yaml = "\
default:
  name: demo
  docker:
    image: busybox
stages: []
build:
  stage: build
  script: [make]
a:
  stage: test
  script: [a]
b:
  stage: doc
  script: [b]
c:
  stage: deploy
  script: [c]
";
        let pipeline = validate(yaml).unwrap();
        assert_eq!(pipeline.stages.len(), 4);
    }
}
