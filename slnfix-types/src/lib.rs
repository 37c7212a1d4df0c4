//! Shared model types for the slnfix workspace.
//!
//! # Design constraints
//! - `ProjectPath` is the identity key for every project set and compares case-insensitively.
//! - Report types are serialized to disk; prefer adding optional fields over changing semantics.
//! - Nothing in this crate touches the filesystem.

pub mod error;
pub mod paths;
pub mod plan;
pub mod project;
pub mod report;

pub use error::UpdateError;
pub use plan::{ConfigurationMapping, FolderEntry, InsertionPlan, NestedProject, PlannedProject};
pub use project::{ProjectPath, ProjectType, SOLUTION_FOLDER_TYPE_GUID};

/// Schema identifiers.
pub mod schema {
    pub const SLNFIX_REPORT_V1: &str = "slnfix.report.v1";
}
