//! Single-solution orchestration and the parallel run driver.
//!
//! These entry points are I/O-agnostic: reads go through `FileView`, the one write per solution
//! goes through `WritePort`.

use crate::discovery::{IgnorePatterns, discover_solutions};
use crate::error::RunError;
use crate::ports::WritePort;
use crate::settings::{RunMode, RunSettings, UpdateSettings};
use camino::Utf8Path;
use chrono::Utc;
use rayon::prelude::*;
use slnfix_domain::{
    FileView, GuidSource, Planner, SolutionDocument, new_references, resolve_closure,
};
use slnfix_edit::{apply_insertion_plan, check_unchanged, render_patch, render_solution, sha256_hex};
use slnfix_types::report::{
    RunCounts, RunReport, SolutionError, SolutionReport, SolutionStatus, ToolInfo,
};
use slnfix_types::{ProjectPath, UpdateError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Ports shared by every worker.
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub files: &'a dyn FileView,
    pub writer: &'a dyn WritePort,
    pub guids: &'a dyn GuidSource,
}

/// Terminal state of one solution update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionOutcome {
    /// Every reachable project is already listed.
    Unchanged,
    /// Projects are missing; nothing was written.
    ChangeDetected {
        new_references: Vec<ProjectPath>,
        patch: Option<String>,
    },
    Written {
        new_references: Vec<ProjectPath>,
        patch: Option<String>,
    },
}

impl SolutionOutcome {
    pub fn is_modified(&self) -> bool {
        !matches!(self, SolutionOutcome::Unchanged)
    }

    pub fn new_references(&self) -> &[ProjectPath] {
        match self {
            SolutionOutcome::Unchanged => &[],
            SolutionOutcome::ChangeDetected { new_references, .. }
            | SolutionOutcome::Written { new_references, .. } => new_references,
        }
    }

    pub fn patch(&self) -> Option<&str> {
        match self {
            SolutionOutcome::Unchanged => None,
            SolutionOutcome::ChangeDetected { patch, .. } | SolutionOutcome::Written { patch, .. } => {
                patch.as_deref()
            }
        }
    }
}

/// Brings one solution up to date with the reference closure of the projects it lists.
///
/// Reads the solution once. When `mode` persists, the fully rendered result is written in a
/// single call, and only after confirming the file has not changed since it was read. Any error
/// leaves the file on disk untouched.
pub fn update_solution(
    ctx: &UpdateContext<'_>,
    path: &Utf8Path,
    mode: RunMode,
    settings: &UpdateSettings,
) -> Result<SolutionOutcome, UpdateError> {
    let text = ctx.files.read_to_string(path)?;
    let original_sha = sha256_hex(text.as_bytes());
    let doc = SolutionDocument::parse(path, &text)?;

    let existing = doc.projects();
    let closure = resolve_closure(
        ctx.files,
        existing.iter().cloned(),
        settings.filter_conditional_references,
    )?;
    let new_refs = new_references(&closure, &existing);
    debug!(
        solution = %path,
        existing = existing.len(),
        closure = closure.len(),
        new = new_refs.len(),
        "closure computed"
    );
    if new_refs.is_empty() {
        return Ok(SolutionOutcome::Unchanged);
    }

    let new_references: Vec<ProjectPath> = new_refs.iter().cloned().collect();
    if !mode.persists() && !settings.preview {
        return Ok(SolutionOutcome::ChangeDetected {
            new_references,
            patch: None,
        });
    }

    let plan = Planner::new(ctx.files, ctx.guids).plan(&doc, &new_refs)?;
    let lines = apply_insertion_plan(path, doc.lines(), doc.line_ending(), &plan)?;
    let rendered = render_solution(&lines);
    let patch = settings
        .preview
        .then(|| render_patch(path, &text, &rendered));

    if !mode.persists() {
        return Ok(SolutionOutcome::ChangeDetected {
            new_references,
            patch,
        });
    }

    check_unchanged(ctx.files, path, &original_sha)?;
    ctx.writer.write_file(path, rendered.as_bytes())?;
    Ok(SolutionOutcome::Written {
        new_references,
        patch,
    })
}

/// Returns whether the solution is (or would be) modified.
pub fn update(
    ctx: &UpdateContext<'_>,
    path: &Utf8Path,
    filter_conditional_references: bool,
    persist: bool,
) -> Result<bool, UpdateError> {
    let mode = if persist { RunMode::Update } else { RunMode::Validate };
    let settings = UpdateSettings {
        filter_conditional_references,
        preview: false,
    };
    update_solution(ctx, path, mode, &settings).map(|outcome| outcome.is_modified())
}

/// Run-wide tallies shared by all workers.
#[derive(Debug, Default)]
pub struct RunCounters {
    examined: AtomicUsize,
    changed: AtomicUsize,
    failed: AtomicUsize,
}

impl RunCounters {
    pub fn record(&self, result: &Result<SolutionOutcome, UpdateError>) {
        self.examined.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(outcome) if outcome.is_modified() => {
                self.changed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(_) => {}
            Err(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self) -> RunCounts {
        RunCounts {
            examined: self.examined.load(Ordering::Relaxed) as u64,
            changed: self.changed.load(Ordering::Relaxed) as u64,
            failed: self.failed.load(Ordering::Relaxed) as u64,
        }
    }
}

fn solution_report(path: &Utf8Path, result: &Result<SolutionOutcome, UpdateError>) -> SolutionReport {
    match result {
        Ok(outcome) => SolutionReport {
            path: path.to_path_buf(),
            status: if outcome.is_modified() {
                SolutionStatus::Changed
            } else {
                SolutionStatus::Unchanged
            },
            new_references: outcome
                .new_references()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            patch: outcome.patch().map(str::to_string),
            error: None,
        },
        Err(err) => SolutionReport {
            path: path.to_path_buf(),
            status: SolutionStatus::Failed,
            new_references: Vec::new(),
            patch: None,
            error: Some(SolutionError::from(err)),
        },
    }
}

/// Discovers the solutions under `settings.target` and updates each on a worker pool.
///
/// Run-level problems (ignore file, bad pattern, missing target) fail before any solution is
/// read. Per-solution failures are recorded in the report and never stop the run.
pub fn run(
    settings: &RunSettings,
    ctx: &UpdateContext<'_>,
    tool: ToolInfo,
) -> Result<RunReport, RunError> {
    let started = Utc::now();
    let ignore =
        IgnorePatterns::from_sources(&settings.ignore_patterns, settings.ignore_file.as_deref())?;
    let solutions = discover_solutions(&settings.target, &ignore)?;
    info!(
        target = %settings.target,
        solutions = solutions.len(),
        ignore_patterns = ignore.len(),
        "discovered solutions"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs)
        .thread_name(|index| format!("slnfix-worker-{index}"))
        .build()
        .map_err(|e| RunError::WorkerPool {
            message: e.to_string(),
        })?;

    let counters = RunCounters::default();
    let mut solution_reports: Vec<SolutionReport> = pool.install(|| {
        solutions
            .par_iter()
            .map(|path| {
                let result = update_solution(ctx, path, settings.mode, &settings.update);
                match &result {
                    Ok(SolutionOutcome::Unchanged) => debug!(solution = %path, "up to date"),
                    Ok(outcome) => info!(
                        solution = %path,
                        new_references = outcome.new_references().len(),
                        written = matches!(outcome, SolutionOutcome::Written { .. }),
                        "missing projects"
                    ),
                    Err(err) => warn!(solution = %path, kind = err.kind(), "{err}"),
                }
                counters.record(&result);
                solution_report(path, &result)
            })
            .collect()
    });
    solution_reports.sort_by(|a, b| a.path.cmp(&b.path));

    let ended = Utc::now();
    let mut report = RunReport::new(tool, settings.mode, started);
    report.ended_at = Some(ended);
    report.duration_ms = u64::try_from((ended - started).num_milliseconds()).ok();
    report.counts = counters.snapshot();
    report.solutions = solution_reports;
    Ok(report)
}
