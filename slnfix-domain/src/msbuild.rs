//! Reader for namespace-qualified build-project documents.
//!
//! The document is parsed once into owned data. A missing `ProjectGuid` is only an error when the
//! GUID is actually asked for, so projects without one can still take part in a closure.

use crate::ports::FileView;
use camino::Utf8Path;
use slnfix_types::paths::resolve_relative;
use slnfix_types::{ProjectPath, UpdateError};
use std::collections::BTreeSet;

pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// One `ProjectReference` declaration as written in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDeclaration {
    pub include: String,
    /// The element or one of its ancestors carries a `Condition` attribute.
    pub conditional: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectDocument {
    path: ProjectPath,
    guid: Option<String>,
    name: Option<String>,
    project_references: Vec<ReferenceDeclaration>,
    runtime_references: Vec<String>,
}

impl ProjectDocument {
    pub fn load(files: &dyn FileView, path: &ProjectPath) -> Result<Self, UpdateError> {
        let text = files.read_to_string(path.as_path())?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &ProjectPath, text: &str) -> Result<Self, UpdateError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| UpdateError::malformed_project(path.as_path(), e.to_string()))?;

        let element_text = |tag: &str| {
            doc.descendants()
                .find(|n| n.has_tag_name((MSBUILD_NAMESPACE, tag)))
                .and_then(|n| n.text())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        };
        let guid = element_text("ProjectGuid");
        let name = element_text("Name");

        let mut project_references = Vec::new();
        for node in doc
            .descendants()
            .filter(|n| n.has_tag_name((MSBUILD_NAMESPACE, "ProjectReference")))
        {
            let include = required_include(path, &node, "ProjectReference")?;
            // ancestors() starts at the node itself.
            let conditional = node
                .ancestors()
                .any(|a| a.is_element() && a.attribute("Condition").is_some());
            project_references.push(ReferenceDeclaration {
                include,
                conditional,
            });
        }

        let mut runtime_references = Vec::new();
        for node in doc
            .descendants()
            .filter(|n| n.has_tag_name((MSBUILD_NAMESPACE, "RuntimeReference")))
        {
            runtime_references.push(required_include(path, &node, "RuntimeReference")?);
        }

        Ok(Self {
            path: path.clone(),
            guid,
            name,
            project_references,
            runtime_references,
        })
    }

    pub fn path(&self) -> &ProjectPath {
        &self.path
    }

    /// Value of the first `ProjectGuid` element.
    pub fn project_guid(&self) -> Result<&str, UpdateError> {
        self.guid.as_deref().ok_or_else(|| {
            UpdateError::malformed_project(self.path.as_path(), "no ProjectGuid element")
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn project_reference_declarations(&self) -> &[ReferenceDeclaration] {
        &self.project_references
    }

    /// `Include` values of the project references, as written.
    pub fn direct_project_references(&self, filter_conditional: bool) -> BTreeSet<String> {
        self.project_references
            .iter()
            .filter(|r| !(filter_conditional && r.conditional))
            .map(|r| r.include.clone())
            .collect()
    }

    /// Project references resolved against the project's directory.
    pub fn direct_project_reference_paths(&self, filter_conditional: bool) -> BTreeSet<ProjectPath> {
        self.direct_project_references(filter_conditional)
            .iter()
            .map(|include| self.resolve(include))
            .collect()
    }

    /// Runtime references are never filtered.
    pub fn direct_runtime_references(&self) -> BTreeSet<ProjectPath> {
        self.runtime_references
            .iter()
            .map(|include| self.resolve(include))
            .collect()
    }

    fn resolve(&self, include: &str) -> ProjectPath {
        let dir: &Utf8Path = self.path.dir();
        ProjectPath::new(resolve_relative(dir, include))
    }
}

fn required_include(
    path: &ProjectPath,
    node: &roxmltree::Node<'_, '_>,
    element: &str,
) -> Result<String, UpdateError> {
    node.attribute("Include")
        .map(str::to_string)
        .ok_or_else(|| {
            UpdateError::malformed_project(
                path.as_path(),
                format!("{element} without an Include attribute"),
            )
        })
}
