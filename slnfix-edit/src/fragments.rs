//! Literal solution-file fragments. Pure string building; GUIDs and paths are already resolved in
//! the plan.

use slnfix_types::{NestedProject, PlannedProject, SOLUTION_FOLDER_TYPE_GUID};

fn entry_block(type_guid: &str, name: &str, path: &str, guid: &str) -> Vec<String> {
    vec![
        format!("Project(\"{type_guid}\") = \"{name}\", \"{path}\", \"{guid}\""),
        "EndProject".to_string(),
    ]
}

/// Two-line `Project(...)`/`EndProject` block for a project.
pub fn project_entry_fragment(project: &PlannedProject) -> Vec<String> {
    entry_block(
        project.project_type.type_guid(),
        &project.name,
        &project.relative_path,
        &project.guid,
    )
}

/// Solution folders use their name as the path.
pub fn folder_entry_fragment(folder_name: &str, folder_guid: &str) -> Vec<String> {
    entry_block(SOLUTION_FOLDER_TYPE_GUID, folder_name, folder_name, folder_guid)
}

pub fn nested_project_line(nested: &NestedProject) -> String {
    format!("\t\t{} = {}", nested.child, nested.parent)
}

/// `ActiveCfg` and `Build.0` lines for every configuration, in the given order.
pub fn configuration_fragment<S: AsRef<str>>(project_guid: &str, configurations: &[S]) -> Vec<String> {
    configurations
        .iter()
        .flat_map(|config| {
            let config = config.as_ref();
            [
                format!("\t\t{project_guid}.{config}.ActiveCfg = {config}"),
                format!("\t\t{project_guid}.{config}.Build.0 = {config}"),
            ]
        })
        .collect()
}
