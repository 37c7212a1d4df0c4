//! Human-readable output and exit codes.

use slnfix_types::report::{RunMode, RunReport, SolutionStatus};

/// `validate` exits with the number of solutions that would change, clamped to 255; when none
/// would change but some failed, 1. `update` exits 1 if any solution failed.
pub fn exit_code(report: &RunReport) -> u8 {
    let counts = &report.counts;
    match report.mode {
        RunMode::Validate if counts.changed > 0 => u8::try_from(counts.changed).unwrap_or(u8::MAX),
        _ if counts.failed > 0 => 1,
        _ => 0,
    }
}

pub fn render_text(report: &RunReport, diff: bool) -> String {
    let mut out = String::new();
    for solution in &report.solutions {
        match solution.status {
            SolutionStatus::Unchanged => {}
            SolutionStatus::Changed => {
                out.push_str(&format!("{}\n", solution.path));
                for reference in &solution.new_references {
                    out.push_str(&format!("  + {reference}\n"));
                }
                if diff && let Some(patch) = &solution.patch {
                    out.push_str(patch);
                }
            }
            SolutionStatus::Failed => {
                let message = solution
                    .error
                    .as_ref()
                    .map(|e| e.message.as_str())
                    .unwrap_or("unknown error");
                out.push_str(&format!("Bad solution `{}`: {}\n", solution.path, message));
            }
        }
    }
    out.push_str(&format!(
        "changed: {}, failed: {}, examined: {}\n",
        report.counts.changed, report.counts.failed, report.counts.examined
    ));
    out
}
