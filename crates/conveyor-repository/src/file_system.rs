//! File system config-file discovery

use crate::error::{RepositoryError, RepositoryResult};
use conveyor_core::constants::{
    DEFAULT_CONFIG_DIRECTORY, DEFAULT_KEY_NAME, NON_JOB_KEY_DEFAULT, YAML_ALT_EXTENSION,
    YAML_EXTENSION,
};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Locates pipeline configuration files inside a repository checkout
#[derive(Debug)]
pub struct ConfigFileRepository {
    /// Root of the checkout
    root: PathBuf,
}

impl ConfigFileRepository {
    /// Create a repository rooted at an existing checkout directory
    pub fn new<P: AsRef<Path>>(root: P) -> RepositoryResult<Self> {
        let path = root.as_ref();
        if !path.exists() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Find the configuration file for a pipeline.
    ///
    /// An explicit `config_path` (relative to the root) wins when it names
    /// an existing file. Otherwise the conventional config directory is
    /// scanned for YAML documents whose `default.name` equals
    /// `pipeline_name`; exactly one match is required, since more than one
    /// means the repository itself is ambiguous about which document
    /// defines the pipeline.
    pub async fn find_config_file(
        &self,
        config_path: Option<&str>,
        pipeline_name: &str,
    ) -> RepositoryResult<PathBuf> {
        if let Some(config_path) = config_path.filter(|p| !p.is_empty()) {
            let candidate = self.root.join(config_path);
            if candidate.is_file() {
                tracing::info!(path = %candidate.display(), "config file found at explicit path");
                return Ok(candidate);
            }
            tracing::warn!(path = config_path, "no config file at explicit path");
            return Err(RepositoryError::NotFound {
                pipeline_name: pipeline_name.to_string(),
            });
        }

        let config_dir = self.root.join(DEFAULT_CONFIG_DIRECTORY);
        let mut matching: Option<PathBuf> = None;

        let mut entries = match fs::read_dir(&config_dir).await {
            Ok(entries) => entries,
            Err(_) => {
                tracing::warn!(dir = %config_dir.display(), "config directory is missing");
                return Err(RepositoryError::NotFound {
                    pipeline_name: pipeline_name.to_string(),
                });
            }
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_yaml_file(&path) {
                continue;
            }
            if self.declares_pipeline(&path, pipeline_name).await? {
                if matching.is_some() {
                    tracing::error!(
                        pipeline = pipeline_name,
                        "multiple config files declare the same pipeline"
                    );
                    return Err(RepositoryError::AmbiguousPipeline {
                        pipeline_name: pipeline_name.to_string(),
                    });
                }
                matching = Some(path);
            }
        }

        match matching {
            Some(path) => {
                tracing::info!(path = %path.display(), "matching config file found");
                Ok(path)
            }
            None => Err(RepositoryError::NotFound {
                pipeline_name: pipeline_name.to_string(),
            }),
        }
    }

    /// Read the bytes of a located configuration file
    pub async fn read_config_file(&self, path: &Path) -> RepositoryResult<String> {
        Ok(fs::read_to_string(path).await?)
    }

    /// Whether the document at `path` declares `default.name` equal to the
    /// requested pipeline name. A cheap serde_yaml probe; full validation
    /// happens later in the compiler.
    async fn declares_pipeline(&self, path: &Path, pipeline_name: &str) -> RepositoryResult<bool> {
        let content = fs::read_to_string(path).await?;
        let document: serde_yaml::Value = match serde_yaml::from_str(&content) {
            Ok(value) => value,
            // An unparsable candidate is not a match; the compiler will
            // report it properly if it is ever selected explicitly.
            Err(_) => return Ok(false),
        };

        let name = document
            .get(NON_JOB_KEY_DEFAULT)
            .and_then(|default| default.get(DEFAULT_KEY_NAME))
            .and_then(|name| name.as_str());
        Ok(name == Some(pipeline_name))
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some(YAML_EXTENSION) | Some(YAML_ALT_EXTENSION)
        )
}
