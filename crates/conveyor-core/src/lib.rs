//! conveyor-core - Core types for the conveyor CI/CD pipeline compiler
//!
//! This crate provides the fundamental types used across the conveyor
//! ecosystem:
//! - Domain entities (Pipeline, Stage, Job)
//! - Lifecycle status
//! - Configuration file constants

pub mod constants;
pub mod entity;
pub mod status;

// Re-export commonly used types
pub use entity::{Job, Pipeline, Stage};
pub use status::Status;
