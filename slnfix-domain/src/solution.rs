//! Line-oriented model of a solution file.
//!
//! The raw lines are authoritative and are never rewritten here. Each line keeps the terminator
//! it was read with, so an untouched document renders back byte for byte. The entry and
//! configuration indexes are derived from the lines once at parse time.

use crate::ports::{FileView, GuidSource};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use slnfix_types::paths::resolve_relative;
use slnfix_types::{ProjectPath, SOLUTION_FOLDER_TYPE_GUID, UpdateError};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const SOLUTION_CONFIGURATIONS_SECTION: &str =
    "GlobalSection(SolutionConfigurationPlatforms) = preSolution";
const END_GLOBAL_SECTION: &str = "EndGlobalSection";

fn project_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^Project\("(?P<type>\{[^}]*\})"\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"(?P<guid>\{[^}]*\})""#,
        )
        .expect("valid regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    CrLf,
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }

    /// Appends this terminator to a bare line.
    pub fn terminate(self, text: &str) -> String {
        format!("{text}{}", self.as_str())
    }
}

/// A stored line without its `\n` or `\r\n` terminator.
pub fn line_text(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// One `Project(...) = ...` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub type_guid: String,
    pub name: String,
    /// Path as written in the solution.
    pub raw_path: String,
    pub guid: String,
    /// Absolute path for real projects; `None` for solution folders.
    pub project: Option<ProjectPath>,
}

impl SolutionEntry {
    pub fn is_folder(&self) -> bool {
        self.project.is_none()
    }
}

/// Result of looking up the Dependencies folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependenciesFolder {
    pub guid: String,
    /// `false` when the GUID is a fresh placeholder and the folder still has to be created.
    pub exists: bool,
}

#[derive(Debug, Clone)]
pub struct SolutionDocument {
    path: Utf8PathBuf,
    has_bom: bool,
    line_ending: LineEnding,
    lines: Vec<String>,
    entries: Vec<SolutionEntry>,
    configurations: Vec<String>,
}

impl SolutionDocument {
    pub fn load(files: &dyn FileView, path: &Utf8Path) -> Result<Self, UpdateError> {
        let text = files.read_to_string(path)?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self, UpdateError> {
        let (has_bom, body) = match text.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let line_ending = match body.find('\n') {
            Some(i) if i > 0 && body.as_bytes()[i - 1] == b'\r' => LineEnding::CrLf,
            Some(_) => LineEnding::Lf,
            None => LineEnding::default(),
        };
        let lines: Vec<String> = body.split_inclusive('\n').map(str::to_string).collect();

        let dir = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let entries = parse_entries(path, dir, &lines)?;
        let configurations = parse_configurations(&lines);

        Ok(Self {
            path: path.to_path_buf(),
            has_bom,
            line_ending,
            lines,
            entries,
            configurations,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Directory against which project paths in the solution are resolved.
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or_else(|| Utf8Path::new(""))
    }

    pub fn has_bom(&self) -> bool {
        self.has_bom
    }

    /// Ending given to inserted lines: the file's first line break decides.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Physical lines, each with its original terminator (the last one may have none).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn entries(&self) -> &[SolutionEntry] {
        &self.entries
    }

    /// Real projects currently listed, case-insensitively deduplicated.
    pub fn projects(&self) -> BTreeSet<ProjectPath> {
        self.entries
            .iter()
            .filter_map(|e| e.project.clone())
            .collect()
    }

    /// Declared `Configuration|Platform` names, in file order.
    pub fn configurations(&self) -> &[String] {
        &self.configurations
    }

    /// Looks up the single folder named `Dependencies`.
    ///
    /// With no such folder a fresh GUID is drawn from `guids` and `exists` is `false`.
    pub fn dependencies_folder(
        &self,
        folder_name: &str,
        guids: &dyn GuidSource,
    ) -> Result<DependenciesFolder, UpdateError> {
        let matches: Vec<&SolutionEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_folder() && e.name == folder_name)
            .collect();
        match matches.as_slice() {
            [] => Ok(DependenciesFolder {
                guid: guids.new_guid(),
                exists: false,
            }),
            [only] => Ok(DependenciesFolder {
                guid: only.guid.clone(),
                exists: true,
            }),
            many => Err(UpdateError::AmbiguousDependenciesFolder {
                solution: self.path.clone(),
                count: many.len(),
            }),
        }
    }
}

fn parse_entries(
    path: &Utf8Path,
    dir: &Utf8Path,
    lines: &[String],
) -> Result<Vec<SolutionEntry>, UpdateError> {
    let re = project_line_regex();
    let mut entries = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let line = line.trim_start();
        if !line.starts_with("Project(") {
            continue;
        }
        let caps = re.captures(line).ok_or_else(|| {
            UpdateError::malformed_solution(
                path,
                format!("line {}: unrecognised project entry", index + 1),
            )
        })?;
        let type_guid = caps["type"].to_string();
        let raw_path = caps["path"].to_string();
        let project = if type_guid.eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE_GUID) {
            None
        } else {
            Some(ProjectPath::new(resolve_relative(dir, &raw_path)))
        };
        entries.push(SolutionEntry {
            type_guid,
            name: caps["name"].to_string(),
            raw_path,
            guid: caps["guid"].to_string(),
            project,
        });
    }
    Ok(entries)
}

fn parse_configurations(lines: &[String]) -> Vec<String> {
    let mut configurations = Vec::new();
    let mut in_section = false;
    for line in lines {
        let trimmed = line.trim();
        if !in_section {
            in_section = trimmed == SOLUTION_CONFIGURATIONS_SECTION;
            continue;
        }
        if trimmed == END_GLOBAL_SECTION {
            break;
        }
        if let Some((name, _)) = trimmed.split_once('=') {
            let name = name.trim();
            if !name.is_empty() && !configurations.iter().any(|c| c == name) {
                configurations.push(name.to_string());
            }
        }
    }
    configurations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedGuid;
    use pretty_assertions::assert_eq;

    const SOLUTION: &str = "\u{feff}\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n\
# Visual Studio 15\r\n\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"A\", \"A\\A.csproj\", \"{AAAAAAAA-0000-0000-0000-000000000000}\"\r\n\
EndProject\r\n\
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Dependencies\", \"Dependencies\", \"{DDDDDDDD-0000-0000-0000-000000000000}\"\r\n\
EndProject\r\n\
Global\r\n\
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r\n\
\t\tDebug|Any CPU = Debug|Any CPU\r\n\
\t\tRelease|Any CPU = Release|Any CPU\r\n\
\tEndGlobalSection\r\n\
EndGlobal\r\n";

    fn parse(text: &str) -> SolutionDocument {
        SolutionDocument::parse(Utf8Path::new("/repo/All.sln"), text).unwrap()
    }

    #[test]
    fn records_bom_and_keeps_line_terminators() {
        let doc = parse(SOLUTION);
        assert!(doc.has_bom());
        assert_eq!(doc.line_ending(), LineEnding::CrLf);
        assert_eq!(doc.lines()[0], "\r\n");
        assert_eq!(doc.lines().last().map(String::as_str), Some("EndGlobal\r\n"));

        let lf = parse("Global\nEndGlobal");
        assert!(!lf.has_bom());
        assert_eq!(lf.line_ending(), LineEnding::Lf);
        assert_eq!(lf.lines(), ["Global\n", "EndGlobal"]);
    }

    #[test]
    fn mixed_terminators_are_kept_per_line() {
        let doc = parse("Global\r\n\tGlobalSection(SolutionProperties) = preSolution\n\tEndGlobalSection\r\nEndGlobal\n");
        assert_eq!(doc.line_ending(), LineEnding::CrLf);
        assert_eq!(
            doc.lines(),
            [
                "Global\r\n",
                "\tGlobalSection(SolutionProperties) = preSolution\n",
                "\tEndGlobalSection\r\n",
                "EndGlobal\n"
            ]
        );
    }

    #[test]
    fn line_text_strips_one_terminator() {
        assert_eq!(line_text("Global\r\n"), "Global");
        assert_eq!(line_text("Global\n"), "Global");
        assert_eq!(line_text("Global"), "Global");
        assert_eq!(line_text("\n"), "");
        assert_eq!(LineEnding::Lf.terminate("x"), "x\n");
    }

    #[test]
    fn classifies_folders_and_projects() {
        let doc = parse(SOLUTION);
        assert_eq!(doc.entries().len(), 2);
        assert!(doc.entries()[1].is_folder());
        let projects: Vec<_> = doc.projects().into_iter().map(|p| p.file_stem().to_string()).collect();
        assert_eq!(projects, vec!["A"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn project_paths_resolve_against_solution_dir() {
        let doc = parse(SOLUTION);
        let project = doc.projects().into_iter().next().unwrap();
        assert_eq!(project.as_str(), "/repo/A/A.csproj");
    }

    #[test]
    fn reads_configurations_in_order() {
        let doc = parse(SOLUTION);
        assert_eq!(doc.configurations(), ["Debug|Any CPU", "Release|Any CPU"]);
    }

    #[test]
    fn existing_dependencies_folder_is_found() {
        let doc = parse(SOLUTION);
        let folder = doc
            .dependencies_folder("Dependencies", &FixedGuid("{NEW}".into()))
            .unwrap();
        assert_eq!(
            folder,
            DependenciesFolder {
                guid: "{DDDDDDDD-0000-0000-0000-000000000000}".into(),
                exists: true
            }
        );
    }

    #[test]
    fn folder_name_match_is_case_sensitive() {
        let doc = parse(&SOLUTION.replace("\"Dependencies\", \"Dependencies\"", "\"dependencies\", \"dependencies\""));
        let folder = doc
            .dependencies_folder("Dependencies", &FixedGuid("{NEW}".into()))
            .unwrap();
        assert_eq!(folder.guid, "{NEW}");
        assert!(!folder.exists);
    }

    #[test]
    fn two_dependencies_folders_are_ambiguous() {
        let extra = "Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Dependencies\", \"Dependencies\", \"{EEEEEEEE-0000-0000-0000-000000000000}\"\r\nEndProject\r\nGlobal\r\n";
        let doc = parse(&SOLUTION.replacen("Global\r\n", extra, 1));
        let err = doc
            .dependencies_folder("Dependencies", &FixedGuid("{NEW}".into()))
            .unwrap_err();
        assert_eq!(err.kind(), "ambiguous_dependencies_folder");
    }

    #[test]
    fn project_line_pattern_compiles_and_captures() {
        let caps = project_line_regex()
            .captures("Project(\"{T}\") = \"A\", \"A\\A.csproj\", \"{G}\"\r\n")
            .unwrap();
        assert_eq!(&caps["type"], "{T}");
        assert_eq!(&caps["name"], "A");
        assert_eq!(&caps["path"], "A\\A.csproj");
        assert_eq!(&caps["guid"], "{G}");
    }

    #[test]
    fn unparsable_project_line_is_malformed() {
        let err = SolutionDocument::parse(
            Utf8Path::new("/repo/Bad.sln"),
            "Project(\"{X}\") = broken\nGlobal\nEndGlobal\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), "malformed_solution");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn project_section_lines_are_not_entries() {
        let text = "Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Items\", \"Items\", \"{11111111-0000-0000-0000-000000000000}\"\n\tProjectSection(SolutionItems) = preProject\n\t\treadme.md = readme.md\n\tEndProjectSection\nEndProject\nGlobal\nEndGlobal\n";
        let doc = parse(text);
        assert_eq!(doc.entries().len(), 1);
        assert!(doc.projects().is_empty());
    }
}
