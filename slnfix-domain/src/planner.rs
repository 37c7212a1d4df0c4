use crate::msbuild::ProjectDocument;
use crate::ports::{FileView, GuidSource};
use crate::solution::SolutionDocument;
use slnfix_types::paths::relative_path_between;
use slnfix_types::{
    ConfigurationMapping, FolderEntry, InsertionPlan, NestedProject, PlannedProject, ProjectPath,
    ProjectType, UpdateError,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Name of the solution folder that collects projects added for closure.
pub const DEPENDENCIES_FOLDER: &str = "Dependencies";

/// `closure - existing`, case-insensitively.
pub fn new_references(
    closure: &BTreeSet<ProjectPath>,
    existing: &BTreeSet<ProjectPath>,
) -> BTreeSet<ProjectPath> {
    closure.difference(existing).cloned().collect()
}

/// Turns a set of missing projects into an [`InsertionPlan`] for one solution.
pub struct Planner<'a> {
    files: &'a dyn FileView,
    guids: &'a dyn GuidSource,
}

impl<'a> Planner<'a> {
    pub fn new(files: &'a dyn FileView, guids: &'a dyn GuidSource) -> Self {
        Self { files, guids }
    }

    /// Builds the plan: the Dependencies folder when it does not exist yet, one entry per new
    /// project in sorted order, a nesting line per project and its configuration mappings.
    ///
    /// Any failure here happens before a single line of the solution is touched.
    pub fn plan(
        &self,
        solution: &SolutionDocument,
        new_refs: &BTreeSet<ProjectPath>,
    ) -> Result<InsertionPlan, UpdateError> {
        let mut plan = InsertionPlan::default();
        if new_refs.is_empty() {
            return Ok(plan);
        }

        let folder = solution.dependencies_folder(DEPENDENCIES_FOLDER, self.guids)?;
        if !folder.exists {
            debug!(solution = %solution.path(), guid = %folder.guid, "creating Dependencies folder");
            plan.folder = Some(FolderEntry {
                name: DEPENDENCIES_FOLDER.to_string(),
                guid: folder.guid.clone(),
            });
        }

        for path in new_refs {
            let project = self.plan_project(solution, path)?;
            plan.nesting.push(NestedProject {
                child: project.guid.clone(),
                parent: folder.guid.clone(),
            });
            for configuration in solution.configurations() {
                plan.configurations.push(ConfigurationMapping {
                    project_guid: project.guid.clone(),
                    configuration: configuration.clone(),
                });
            }
            plan.projects.push(project);
        }

        Ok(plan)
    }

    fn plan_project(
        &self,
        solution: &SolutionDocument,
        path: &ProjectPath,
    ) -> Result<PlannedProject, UpdateError> {
        let project_type = ProjectType::for_project(path)?;
        let doc = ProjectDocument::load(self.files, path)?;
        let guid = doc.project_guid()?.to_string();
        Ok(PlannedProject {
            path: path.clone(),
            project_type,
            name: path.file_stem().to_string(),
            relative_path: relative_path_between(solution.dir(), path.as_path()),
            guid,
        })
    }
}
