//! Finding the solutions a run should process.

use crate::error::RunError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use regex::Regex;
use tracing::debug;

/// Compiled ignore patterns, matched anywhere in the full solution path.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<Regex>,
}

impl IgnorePatterns {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RunError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|e| RunError::InvalidIgnorePattern {
                    pattern: p.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Inline patterns first, then the lines of `ignore_file` if one is given.
    pub fn from_sources(inline: &[String], ignore_file: Option<&Utf8Path>) -> Result<Self, RunError> {
        let mut all: Vec<String> = inline.to_vec();
        if let Some(path) = ignore_file {
            all.extend(load_ignore_file(path)?);
        }
        Self::compile(&all)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &Utf8Path) -> bool {
        self.patterns.iter().any(|re| re.is_match(path.as_str()))
    }
}

/// Reads one pattern per line; `#` comment lines and blank lines are skipped.
pub fn load_ignore_file(path: &Utf8Path) -> Result<Vec<String>, RunError> {
    if !path.is_file() {
        return Err(RunError::IgnorePatternFileUnavailable {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| RunError::Discovery {
        message: e.to_string(),
    })?;
    Ok(parse_ignore_patterns(&text))
}

pub fn parse_ignore_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Lists the solutions under `target`, sorted.
///
/// A file target is returned as-is and never filtered; a directory is searched recursively for
/// `*.sln` and paths matching an ignore pattern are dropped.
pub fn discover_solutions(
    target: &Utf8Path,
    ignore: &IgnorePatterns,
) -> Result<Vec<Utf8PathBuf>, RunError> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(RunError::TargetNotFound {
            path: target.to_path_buf(),
        });
    }

    let pattern = format!("{}/**/*.sln", glob::Pattern::escape(target.as_str()));
    debug!(pattern = %pattern, "scanning for solutions");

    let mut out = Vec::new();
    let entries = glob(&pattern).map_err(|e| RunError::Discovery {
        message: e.to_string(),
    })?;
    for entry in entries {
        let path = entry.map_err(|e| RunError::Discovery {
            message: format!("glob error: {e}"),
        })?;
        let path = Utf8PathBuf::from_path_buf(path).map_err(|p| RunError::Discovery {
            message: format!("non-UTF-8 path {}", p.display()),
        })?;
        if ignore.is_ignored(&path) {
            debug!(solution = %path, "ignored");
            continue;
        }
        out.push(path);
    }

    out.sort();
    Ok(out)
}
