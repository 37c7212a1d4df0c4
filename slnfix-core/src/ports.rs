//! Port traits abstracting writes away from the pipeline.

use camino::Utf8Path;
use slnfix_types::UpdateError;

/// File-system write operations. Called at most once per solution.
pub trait WritePort: Send + Sync {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), UpdateError>;
}
