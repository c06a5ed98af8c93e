//! Constants for the pipeline configuration file format

/// Keys recognized inside the `default` section
pub const DEFAULT_KEY_NAME: &str = "name";
pub const DEFAULT_KEY_DOCKER: &str = "docker";
pub const DEFAULT_KEY_DOCKER_REGISTRY: &str = "registry";
pub const DEFAULT_KEY_DOCKER_IMAGE: &str = "image";
pub const DEFAULT_KEY_PATHS: &str = "paths";

/// Top-level declaration keys (everything else is a job)
pub const NON_JOB_KEY_DEFAULT: &str = "default";
pub const NON_JOB_KEY_INCLUDE: &str = "include";
pub const NON_JOB_KEY_STAGES: &str = "stages";
pub const NON_JOB_KEY_WORKFLOW: &str = "workflow";

pub const NON_JOB_KEYS: &[&str] = &[
    NON_JOB_KEY_DEFAULT,
    NON_JOB_KEY_INCLUDE,
    NON_JOB_KEY_STAGES,
    NON_JOB_KEY_WORKFLOW,
];

pub const STAGES_KEY: &str = "stages";

/// Stage order installed when the file declares no `stages` list
pub const DEFAULT_STAGES: &[&str] = &["build", "test", "doc", "deploy"];

/// Keys recognized inside a job entry
pub const JOB_KEY_SCRIPT: &str = "script";
pub const JOB_KEY_STAGE: &str = "stage";
pub const JOB_KEY_NEEDS: &str = "needs";
pub const JOB_KEY_DOCKER: &str = "docker";
pub const JOB_KEY_DOCKER_REGISTRY: &str = "registry";
pub const JOB_KEY_DOCKER_IMAGE: &str = "image";
pub const JOB_KEY_ARTIFACTS: &str = "artifacts";
pub const JOB_KEY_PATHS: &str = "paths";
pub const JOB_KEY_ALLOW_FAILURE: &str = "allow_failure";

/// Registry assumed when neither the job nor the defaults declare one
pub const DOCKERHUB_REGISTRY: &str = "docker.io";

/// Where config files live inside a repository checkout
pub const DEFAULT_CONFIG_DIRECTORY: &str = ".cicd-pipelines";
pub const YAML_EXTENSION: &str = "yml";
pub const YAML_ALT_EXTENSION: &str = "yaml";
