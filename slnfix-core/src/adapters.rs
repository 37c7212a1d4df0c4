//! Default port implementations.

use crate::ports::WritePort;
use camino::Utf8Path;
use fs_err as fs;
use slnfix_domain::MemoryFileView;
use slnfix_types::UpdateError;
use tracing::debug;

/// Writes directly to the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), UpdateError> {
        debug!(path = %path, bytes = contents.len(), "writing solution");
        fs::write(path, contents).map_err(|e| UpdateError::from_io(path, e))
    }
}

/// Writes land back in the same in-memory tree the pipeline reads from.
impl WritePort for MemoryFileView {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), UpdateError> {
        let text = String::from_utf8(contents.to_vec()).map_err(|e| UpdateError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        self.insert(path.as_str(), text)
    }
}
