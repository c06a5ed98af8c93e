//! conveyor-repository - config-file discovery
//!
//! Locates the pipeline configuration document inside a repository
//! checkout, either by an explicit relative path or by searching the
//! conventional config directory for a document whose `default.name`
//! matches a requested pipeline name. The compiler itself never touches
//! the file system; this crate is the collaborator that hands it bytes.

pub mod error;
pub mod file_system;

pub use error::{RepositoryError, RepositoryResult};
pub use file_system::ConfigFileRepository;
