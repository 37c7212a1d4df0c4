use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a run only detects missing projects or also writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Validate,
    Update,
}

impl RunMode {
    pub fn persists(self) -> bool {
        matches!(self, RunMode::Update)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    pub counts: RunCounts,

    #[serde(default)]
    pub solutions: Vec<SolutionReport>,
}

impl RunReport {
    pub fn new(tool: ToolInfo, mode: RunMode, started_at: DateTime<Utc>) -> Self {
        Self {
            schema: crate::schema::SLNFIX_REPORT_V1.to_string(),
            tool,
            mode,
            started_at,
            ended_at: None,
            duration_ms: None,
            counts: RunCounts::default(),
            solutions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub examined: u64,
    pub changed: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub path: Utf8PathBuf,
    pub status: SolutionStatus,

    /// Projects missing from the solution, sorted case-insensitively.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_references: Vec<String>,

    /// Unified diff of the change, when a preview was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SolutionError>,
}

/// `changed` means "written" in update mode and "would change" in validate mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Unchanged,
    Changed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionError {
    pub kind: String,
    pub message: String,
}

impl From<&crate::UpdateError> for SolutionError {
    fn from(err: &crate::UpdateError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "slnfix".to_string(),
            version: "0.1.0".to_string(),
        }
    }

    #[test]
    fn new_report_carries_schema() {
        let report = RunReport::new(tool(), RunMode::Validate, Utc::now());
        assert_eq!(report.schema, crate::schema::SLNFIX_REPORT_V1);
        assert_eq!(report.counts, RunCounts::default());
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn report_json_shape() {
        let mut report = RunReport::new(tool(), RunMode::Update, Utc::now());
        report.counts = RunCounts {
            examined: 2,
            changed: 1,
            failed: 1,
        };
        report.solutions.push(SolutionReport {
            path: "/repo/A.sln".into(),
            status: SolutionStatus::Changed,
            new_references: vec!["/repo/B/B.csproj".into()],
            patch: None,
            error: None,
        });
        let err = crate::UpdateError::MissingFile {
            path: "/repo/Z/Z.csproj".into(),
        };
        report.solutions.push(SolutionReport {
            path: "/repo/Broken.sln".into(),
            status: SolutionStatus::Failed,
            new_references: Vec::new(),
            patch: None,
            error: Some(SolutionError::from(&err)),
        });

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["mode"], "update");
        assert_eq!(value["counts"]["changed"], 1);
        assert_eq!(value["solutions"][0]["status"], "changed");
        assert!(value["solutions"][0].get("error").is_none());
        assert_eq!(value["solutions"][1]["error"]["kind"], "missing_file");
        assert!(value["solutions"][1].get("new_references").is_none());
        assert!(value.get("ended_at").is_none());
    }

    #[test]
    fn only_update_persists() {
        assert!(RunMode::Update.persists());
        assert!(!RunMode::Validate.persists());
    }
}
