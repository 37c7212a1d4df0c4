use crate::msbuild::ProjectDocument;
use crate::ports::FileView;
use slnfix_types::{ProjectPath, ProjectType, UpdateError};
use std::collections::BTreeSet;
use tracing::debug;

/// Computes every project reachable from `seeds` through project and runtime references.
///
/// Iterative depth-first walk with a resolved set, so cycles and diamonds terminate. Each visited
/// project must have a supported extension and must exist. With `filter_conditional`, project
/// references that are (or sit under) a conditional element are not followed; runtime references
/// always are.
pub fn resolve_closure<I>(
    files: &dyn FileView,
    seeds: I,
    filter_conditional: bool,
) -> Result<BTreeSet<ProjectPath>, UpdateError>
where
    I: IntoIterator<Item = ProjectPath>,
{
    let distinct: BTreeSet<ProjectPath> = seeds.into_iter().collect();
    let mut stack: Vec<ProjectPath> = distinct.into_iter().collect();
    let mut resolved: BTreeSet<ProjectPath> = BTreeSet::new();

    while let Some(current) = stack.pop() {
        if resolved.contains(&current) {
            continue;
        }

        ProjectType::for_project(&current)?;
        let doc = ProjectDocument::load(files, &current)?;
        resolved.insert(current);

        let next = doc
            .direct_project_reference_paths(filter_conditional)
            .into_iter()
            .chain(doc.direct_runtime_references());
        for reference in next {
            if !resolved.contains(&reference) {
                debug!(
                    from = %doc.path(),
                    name = doc.name().unwrap_or_default(),
                    to = %reference,
                    "follow reference"
                );
                stack.push(reference);
            }
        }
    }

    Ok(resolved)
}
