//! Edit engine for slnfix insertion plans.
//!
//! Responsibilities:
//! - Render plan entries as literal solution fragments.
//! - Splice them into the solution's line sequence at the structural anchors, leaving every
//!   other line untouched.
//! - Render the result (UTF-8 with BOM) and a unified diff preview.
//! - Guard the single write with a sha256 precondition.

pub mod fragments;
pub mod mutate;
pub mod preconditions;
pub mod render;

pub use fragments::{
    configuration_fragment, folder_entry_fragment, nested_project_line, project_entry_fragment,
};
pub use mutate::{
    apply_insertion_plan, insert_configurations, insert_nested_projects, insert_project_blocks,
};
pub use preconditions::{check_unchanged, sha256_hex};
pub use render::{render_patch, render_solution};
