//! The three insertion passes.
//!
//! Each pass consumes a whole line sequence and returns a new one. Lines carry their own
//! terminators; existing lines are never rewritten, reindented or reordered, and only inserted
//! lines receive the solution's dominant line ending. A pass with nothing to insert returns its
//! input unchanged and needs no anchor.

use crate::fragments::{
    configuration_fragment, folder_entry_fragment, nested_project_line, project_entry_fragment,
};
use camino::Utf8Path;
use slnfix_domain::{LineEnding, line_text};
use slnfix_types::{InsertionPlan, UpdateError};
use tracing::debug;

pub const GLOBAL: &str = "Global";
pub const END_GLOBAL: &str = "EndGlobal";
pub const END_GLOBAL_SECTION: &str = "EndGlobalSection";
pub const NESTED_PROJECTS_SECTION: &str = "GlobalSection(NestedProjects) = preSolution";
pub const PROJECT_CONFIGURATIONS_SECTION: &str =
    "GlobalSection(ProjectConfigurationPlatforms) = postSolution";

fn position_trimmed(lines: &[String], anchor: &str) -> Option<usize> {
    lines.iter().position(|l| l.trim() == anchor)
}

/// Inserts `insert` at `at`, terminating each new line with `eol`.
///
/// An unterminated line right before `at` can only be the last line of the file; it gets `eol`
/// so the first inserted line starts on a line of its own.
fn splice(mut lines: Vec<String>, at: usize, insert: Vec<String>, eol: LineEnding) -> Vec<String> {
    if let Some(prev) = at.checked_sub(1).and_then(|i| lines.get_mut(i))
        && !prev.ends_with('\n')
    {
        prev.push_str(eol.as_str());
    }
    lines.splice(at..at, insert.iter().map(|l| eol.terminate(l)));
    lines
}

/// Appends a whole `GlobalSection` immediately before `EndGlobal`.
fn insert_section_before_end_global(
    path: &Utf8Path,
    lines: Vec<String>,
    header: &str,
    body: Vec<String>,
    eol: LineEnding,
) -> Result<Vec<String>, UpdateError> {
    let at = position_trimmed(&lines, END_GLOBAL).ok_or_else(|| {
        UpdateError::malformed_solution(path, format!("no `{END_GLOBAL}` line"))
    })?;
    let mut section = Vec::with_capacity(body.len() + 2);
    section.push(format!("\t{header}"));
    section.extend(body);
    section.push(format!("\t{END_GLOBAL_SECTION}"));
    Ok(splice(lines, at, section, eol))
}

/// Pass 1: entry blocks go before the first line exactly equal to `Global`.
pub fn insert_project_blocks(
    path: &Utf8Path,
    lines: Vec<String>,
    blocks: Vec<String>,
    eol: LineEnding,
) -> Result<Vec<String>, UpdateError> {
    if blocks.is_empty() {
        return Ok(lines);
    }
    let at = lines
        .iter()
        .position(|l| line_text(l) == GLOBAL)
        .ok_or_else(|| UpdateError::malformed_solution(path, format!("no `{GLOBAL}` line")))?;
    Ok(splice(lines, at, blocks, eol))
}

/// Pass 2: mapping lines go right after an existing `NestedProjects` header, or into a new
/// section before `EndGlobal`.
pub fn insert_nested_projects(
    path: &Utf8Path,
    lines: Vec<String>,
    mappings: Vec<String>,
    eol: LineEnding,
) -> Result<Vec<String>, UpdateError> {
    if mappings.is_empty() {
        return Ok(lines);
    }
    match position_trimmed(&lines, NESTED_PROJECTS_SECTION) {
        Some(at) => Ok(splice(lines, at + 1, mappings, eol)),
        None => {
            debug!(solution = %path, "creating NestedProjects section");
            insert_section_before_end_global(path, lines, NESTED_PROJECTS_SECTION, mappings, eol)
        }
    }
}

/// Pass 3: configuration lines go right after the `ProjectConfigurationPlatforms` header, or
/// into a new section before `EndGlobal`.
pub fn insert_configurations(
    path: &Utf8Path,
    lines: Vec<String>,
    configuration_lines: Vec<String>,
    eol: LineEnding,
) -> Result<Vec<String>, UpdateError> {
    if configuration_lines.is_empty() {
        return Ok(lines);
    }
    match position_trimmed(&lines, PROJECT_CONFIGURATIONS_SECTION) {
        Some(at) => Ok(splice(lines, at + 1, configuration_lines, eol)),
        None => {
            debug!(solution = %path, "creating ProjectConfigurationPlatforms section");
            insert_section_before_end_global(
                path,
                lines,
                PROJECT_CONFIGURATIONS_SECTION,
                configuration_lines,
                eol,
            )
        }
    }
}

/// Runs the three passes, in order, over a copy of `lines`.
pub fn apply_insertion_plan(
    path: &Utf8Path,
    lines: &[String],
    eol: LineEnding,
    plan: &InsertionPlan,
) -> Result<Vec<String>, UpdateError> {
    let mut blocks = Vec::new();
    if let Some(folder) = &plan.folder {
        blocks.extend(folder_entry_fragment(&folder.name, &folder.guid));
    }
    for project in &plan.projects {
        blocks.extend(project_entry_fragment(project));
    }
    let mappings: Vec<String> = plan.nesting.iter().map(nested_project_line).collect();
    let configuration_lines: Vec<String> = plan
        .configurations
        .iter()
        .flat_map(|m| configuration_fragment(&m.project_guid, &[m.configuration.as_str()]))
        .collect();

    let lines = insert_project_blocks(path, lines.to_vec(), blocks, eol)?;
    let lines = insert_nested_projects(path, lines, mappings, eol)?;
    insert_configurations(path, lines, configuration_lines, eol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LF: LineEnding = LineEnding::Lf;

    fn lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(str::to_string).collect()
    }

    fn bare(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn path() -> &'static Utf8Path {
        Utf8Path::new("/repo/All.sln")
    }

    #[test]
    fn project_blocks_go_before_global() {
        let out = insert_project_blocks(
            path(),
            lines("Project(x)\nEndProject\nGlobal\nEndGlobal\n"),
            bare("Project(y)\nEndProject"),
            LF,
        )
        .unwrap();
        assert_eq!(
            out,
            lines("Project(x)\nEndProject\nProject(y)\nEndProject\nGlobal\nEndGlobal\n")
        );
    }

    #[test]
    fn global_must_match_exactly() {
        let err =
            insert_project_blocks(path(), lines(" Global\nEndGlobal\n"), bare("X"), LF).unwrap_err();
        assert_eq!(err.kind(), "malformed_solution");
    }

    #[test]
    fn nothing_to_insert_needs_no_anchor() {
        let input = lines("no anchors here\n");
        assert_eq!(insert_project_blocks(path(), input.clone(), vec![], LF).unwrap(), input);
        assert_eq!(insert_nested_projects(path(), input.clone(), vec![], LF).unwrap(), input);
        assert_eq!(insert_configurations(path(), input.clone(), vec![], LF).unwrap(), input);
    }

    #[test]
    fn nested_projects_appended_to_existing_section_head() {
        let input = lines(
            "Global\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{OLD} = {F}\n\tEndGlobalSection\nEndGlobal\n",
        );
        let out = insert_nested_projects(path(), input, vec!["\t\t{NEW} = {F}".into()], LF).unwrap();
        assert_eq!(
            out,
            lines("Global\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{NEW} = {F}\n\t\t{OLD} = {F}\n\tEndGlobalSection\nEndGlobal\n")
        );
    }

    #[test]
    fn nested_projects_section_created_before_end_global() {
        let input = lines("Global\n\tGlobalSection(SolutionProperties) = preSolution\n\tEndGlobalSection\nEndGlobal");
        let out = insert_nested_projects(path(), input, vec!["\t\t{B} = {F}".into()], LF).unwrap();
        assert_eq!(
            out,
            lines("Global\n\tGlobalSection(SolutionProperties) = preSolution\n\tEndGlobalSection\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{B} = {F}\n\tEndGlobalSection\nEndGlobal")
        );
    }

    #[test]
    fn missing_end_global_is_malformed() {
        let err = insert_nested_projects(path(), lines("Global\n"), vec!["x".into()], LF).unwrap_err();
        assert_eq!(err.kind(), "malformed_solution");
        assert!(err.to_string().contains("EndGlobal"));
    }

    #[test]
    fn configurations_go_after_section_header() {
        let input = lines("Global\n\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\n\t\t{A}.Debug|x86.ActiveCfg = Debug|x86\n\tEndGlobalSection\nEndGlobal\n");
        let out = insert_configurations(
            path(),
            input,
            vec!["\t\t{B}.Debug|x86.ActiveCfg = Debug|x86".into()],
            LF,
        )
        .unwrap();
        assert_eq!(out[2], "\t\t{B}.Debug|x86.ActiveCfg = Debug|x86\n");
        assert_eq!(out[3], "\t\t{A}.Debug|x86.ActiveCfg = Debug|x86\n");
    }

    #[test]
    fn configurations_section_created_when_absent() {
        let out =
            insert_configurations(path(), lines("Global\nEndGlobal\n"), vec!["\t\tcfg".into()], LF)
                .unwrap();
        assert_eq!(
            out,
            lines("Global\n\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\n\t\tcfg\n\tEndGlobalSection\nEndGlobal\n")
        );
    }

    #[test]
    fn inserted_lines_take_the_dominant_ending_and_neighbours_keep_theirs() {
        let input = lines(
            "Global\r\n\tGlobalSection(SolutionProperties) = preSolution\n\t\tHideSolutionNode = FALSE\n\tEndGlobalSection\r\nEndGlobal\r\n",
        );
        let out =
            insert_nested_projects(path(), input, vec!["\t\t{B} = {F}".into()], LineEnding::CrLf)
                .unwrap();
        assert_eq!(
            out.concat(),
            "Global\r\n\tGlobalSection(SolutionProperties) = preSolution\n\t\tHideSolutionNode = FALSE\n\tEndGlobalSection\r\n\tGlobalSection(NestedProjects) = preSolution\r\n\t\t{B} = {F}\r\n\tEndGlobalSection\r\nEndGlobal\r\n"
        );
    }

    #[test]
    fn unterminated_header_at_end_of_file_is_terminated_before_insertion() {
        let input = lines("Global\n\tGlobalSection(NestedProjects) = preSolution");
        let out = insert_nested_projects(path(), input, vec!["\t\t{B} = {F}".into()], LF).unwrap();
        assert_eq!(
            out,
            lines("Global\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{B} = {F}\n")
        );
    }
}
