//! The per-update insertion plan.
//!
//! A plan is built fresh for each update call and consumed by the mutation passes; it is never
//! persisted. Order matters: fragments are emitted exactly in the order stored here.

use crate::project::{ProjectPath, ProjectType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionPlan {
    /// Present only when the Dependencies folder has to be created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderEntry>,

    #[serde(default)]
    pub projects: Vec<PlannedProject>,

    #[serde(default)]
    pub nesting: Vec<NestedProject>,

    #[serde(default)]
    pub configurations: Vec<ConfigurationMapping>,
}

impl InsertionPlan {
    pub fn is_empty(&self) -> bool {
        self.folder.is_none()
            && self.projects.is_empty()
            && self.nesting.is_empty()
            && self.configurations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub guid: String,
}

/// A project that will be appended to the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedProject {
    pub path: ProjectPath,
    pub project_type: ProjectType,
    /// Display name (file stem of the project file).
    pub name: String,
    /// Solution-relative, backslash-delimited.
    pub relative_path: String,
    pub guid: String,
}

/// `{child} = {parent}` line in the `NestedProjects` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedProject {
    pub child: String,
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationMapping {
    pub project_guid: String,
    /// `Configuration|Platform`, e.g. `Debug|Any CPU`.
    pub configuration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_empty() {
        assert!(InsertionPlan::default().is_empty());
    }

    #[test]
    fn folder_alone_makes_plan_non_empty() {
        let plan = InsertionPlan {
            folder: Some(FolderEntry {
                name: "Dependencies".to_string(),
                guid: "{DA34CE5D-031A-4C97-8DE8-A81F98C0288A}".to_string(),
            }),
            ..InsertionPlan::default()
        };
        assert!(!plan.is_empty());
    }
}
