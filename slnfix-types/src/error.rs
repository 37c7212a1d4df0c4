//! Per-solution error taxonomy.
//!
//! Every variant is scoped to a single solution update: the run driver catches it, counts it and
//! moves on to the next solution.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    /// A build-project file could not be parsed or lacks a required element.
    #[error("malformed project {path}: {message}")]
    MalformedProject { path: Utf8PathBuf, message: String },

    /// A project file extension has no known project-type GUID.
    #[error("unsupported project type `{extension}` for {path}")]
    UnsupportedProjectType {
        path: Utf8PathBuf,
        extension: String,
    },

    #[error("{count} solution folders named `Dependencies` in {solution}")]
    AmbiguousDependenciesFolder { solution: Utf8PathBuf, count: usize },

    /// A referenced project or runtime-reference target does not exist.
    #[error("missing file {path}")]
    MissingFile { path: Utf8PathBuf },

    /// A required structural line is missing or a project line cannot be parsed.
    #[error("malformed solution {path}: {message}")]
    MalformedSolution { path: Utf8PathBuf, message: String },

    /// The solution changed on disk between read and write.
    #[error("solution {path} changed on disk since it was read; not written")]
    ConcurrentModification { path: Utf8PathBuf },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    /// Stable token used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateError::MalformedProject { .. } => "malformed_project",
            UpdateError::UnsupportedProjectType { .. } => "unsupported_project_type",
            UpdateError::AmbiguousDependenciesFolder { .. } => "ambiguous_dependencies_folder",
            UpdateError::MissingFile { .. } => "missing_file",
            UpdateError::MalformedSolution { .. } => "malformed_solution",
            UpdateError::ConcurrentModification { .. } => "concurrent_modification",
            UpdateError::Io { .. } => "io",
        }
    }

    /// Maps a filesystem error for `path`, treating not-found as [`UpdateError::MissingFile`].
    pub fn from_io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            UpdateError::MissingFile { path }
        } else {
            UpdateError::Io { path, source }
        }
    }

    pub fn malformed_project(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        UpdateError::MalformedProject {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed_solution(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        UpdateError::MalformedSolution {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateError;
    use std::io;

    #[test]
    fn not_found_maps_to_missing_file() {
        let err = UpdateError::from_io("/repo/B/B.csproj", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), "missing_file");
        assert_eq!(err.to_string(), "missing file /repo/B/B.csproj");
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = UpdateError::from_io(
            "/repo/A.sln",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), "io");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn ambiguous_folder_message_names_the_solution() {
        let err = UpdateError::AmbiguousDependenciesFolder {
            solution: "/repo/All.sln".into(),
            count: 2,
        };
        assert_eq!(err.kind(), "ambiguous_dependencies_folder");
        assert!(err.to_string().contains("/repo/All.sln"));
        assert!(err.to_string().starts_with("2 solution folders"));
    }
}
