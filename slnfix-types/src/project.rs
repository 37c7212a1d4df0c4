use crate::error::UpdateError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type GUID Visual Studio uses for solution folders.
pub const SOLUTION_FOLDER_TYPE_GUID: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

/// Absolute, lexically normalized path to a build-project file.
///
/// Equality, ordering and hashing use a lowercased, forward-slash key so that `C:\X\A.csproj`
/// and `c:/x/a.csproj` are the same project even on case-sensitive filesystems. The original
/// spelling is kept for display and for filesystem access.
#[derive(Debug, Clone)]
pub struct ProjectPath {
    path: Utf8PathBuf,
    key: String,
}

impl ProjectPath {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let key = path.as_str().replace('\\', "/").to_lowercase();
        Self { path, key }
    }

    pub fn as_path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        self.path.as_str()
    }

    /// Directory that contains the project file.
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or_else(|| Utf8Path::new(""))
    }

    /// File name without extension; this is the display name used in solution entries.
    pub fn file_stem(&self) -> &str {
        self.path.file_stem().unwrap_or_default()
    }

    /// Lowercased extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default()
    }

    pub fn into_path_buf(self) -> Utf8PathBuf {
        self.path
    }
}

impl PartialEq for ProjectPath {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ProjectPath {}

impl Hash for ProjectPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ProjectPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProjectPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path.as_str())
    }
}

impl From<Utf8PathBuf> for ProjectPath {
    fn from(path: Utf8PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ProjectPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Serialize for ProjectPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Project kinds this tool knows how to add to a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    CSharp,
    Sql,
    Synergy,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [ProjectType::CSharp, ProjectType::Sql, ProjectType::Synergy];

    pub fn extension(self) -> &'static str {
        match self {
            ProjectType::CSharp => ".csproj",
            ProjectType::Sql => ".sqlproj",
            ProjectType::Synergy => ".synproj",
        }
    }

    /// The GUID Visual Studio uses to identify this project type.
    pub fn type_guid(self) -> &'static str {
        match self {
            ProjectType::CSharp => "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}",
            ProjectType::Sql => "{00D1A9C2-B5F0-4AF3-8072-F6C62B433612}",
            ProjectType::Synergy => "{BBD0F5D1-1CC4-42FD-BA4C-A96779C64378}",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let wanted = extension.to_lowercase();
        Self::ALL.into_iter().find(|t| t.extension() == wanted)
    }

    /// Looks up the type of `project`; unknown extensions are an error, never skipped.
    pub fn for_project(project: &ProjectPath) -> Result<Self, UpdateError> {
        let extension = project.extension();
        Self::from_extension(&extension).ok_or_else(|| UpdateError::UnsupportedProjectType {
            path: project.as_path().to_path_buf(),
            extension,
        })
    }
}
