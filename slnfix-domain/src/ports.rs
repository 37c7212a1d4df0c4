use camino::Utf8Path;
use fs_err as fs;
use slnfix_types::UpdateError;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Read-only file access used by the reader, the closure and the planner.
///
/// Not-found must surface as [`UpdateError::MissingFile`].
pub trait FileView: Send + Sync {
    fn read_to_string(&self, path: &Utf8Path) -> Result<String, UpdateError>;
}

/// File-system backed `FileView`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileView;

impl FileView for FsFileView {
    fn read_to_string(&self, path: &Utf8Path) -> Result<String, UpdateError> {
        fs::read_to_string(path).map_err(|e| UpdateError::from_io(path, e))
    }
}

/// In-memory file tree keyed case-insensitively, the way Windows resolves solution paths.
#[derive(Debug, Default)]
pub struct MemoryFileView {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryFileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<str>, contents: impl Into<String>) -> Self {
        self.files
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(memory_key(path.as_ref()), contents.into());
        self
    }

    /// Fails with [`UpdateError::Io`] if a writer panicked while holding the tree.
    pub fn insert(
        &self,
        path: impl AsRef<str>,
        contents: impl Into<String>,
    ) -> Result<(), UpdateError> {
        let path = path.as_ref();
        let mut files = self.files.write().map_err(|_| poisoned(path))?;
        files.insert(memory_key(path), contents.into());
        Ok(())
    }

    pub fn get(&self, path: impl AsRef<str>) -> Option<String> {
        let key = memory_key(path.as_ref());
        self.files.read().ok()?.get(&key).cloned()
    }
}

fn memory_key(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

fn poisoned(path: &str) -> UpdateError {
    UpdateError::Io {
        path: path.into(),
        source: std::io::Error::other("in-memory file tree lock poisoned"),
    }
}

impl FileView for MemoryFileView {
    fn read_to_string(&self, path: &Utf8Path) -> Result<String, UpdateError> {
        let files = self.files.read().map_err(|_| poisoned(path.as_str()))?;
        files
            .get(&memory_key(path.as_str()))
            .cloned()
            .ok_or_else(|| UpdateError::MissingFile {
                path: path.to_path_buf(),
            })
    }
}

/// Supplies the GUID for a Dependencies folder that has to be created.
pub trait GuidSource: Send + Sync {
    /// Uppercase, brace-wrapped, e.g. `{DA34CE5D-031A-4C97-8DE8-A81F98C0288A}`.
    fn new_guid(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGuids;

impl GuidSource for RandomGuids {
    fn new_guid(&self) -> String {
        format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase())
    }
}

/// Always hands out the same GUID; makes generated solutions reproducible.
#[derive(Debug, Clone)]
pub struct FixedGuid(pub String);

impl GuidSource for FixedGuid {
    fn new_guid(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_view_is_case_insensitive() {
        let view = MemoryFileView::new().with_file("/Repo/A/A.csproj", "<Project/>");
        assert!(view.get("/repo/a/a.CSPROJ").is_some());
        assert_eq!(
            view.read_to_string(Utf8Path::new("/REPO/A/A.csproj")).unwrap(),
            "<Project/>"
        );
    }

    #[test]
    fn memory_view_reports_missing_file() {
        let view = MemoryFileView::new();
        let err = view.read_to_string(Utf8Path::new("/repo/Z.csproj")).unwrap_err();
        assert_eq!(err.kind(), "missing_file");
    }

    #[test]
    fn poisoned_tree_fails_reads_and_writes() {
        let view = std::sync::Arc::new(MemoryFileView::new().with_file("/repo/All.sln", "Global"));
        let holder = std::sync::Arc::clone(&view);
        let _ = std::thread::spawn(move || {
            let _guard = holder.files.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let err = view.insert("/repo/All.sln", "EndGlobal").unwrap_err();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("/repo/All.sln"));
        let err = view.read_to_string(Utf8Path::new("/repo/All.sln")).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn fs_view_reports_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = camino::Utf8PathBuf::from_path_buf(temp.path().join("nope.csproj")).unwrap();
        let err = FsFileView.read_to_string(&missing).unwrap_err();
        assert_eq!(err.kind(), "missing_file");
    }

    #[test]
    fn random_guids_are_braced_uppercase_and_distinct() {
        let a = RandomGuids.new_guid();
        let b = RandomGuids.new_guid();
        assert_ne!(a, b);
        assert_eq!(a.len(), 38);
        assert!(a.starts_with('{') && a.ends_with('}'));
        assert_eq!(a, a.to_uppercase());
    }

    #[test]
    fn fixed_guid_repeats() {
        let source = FixedGuid("{00000000-0000-0000-0000-000000000001}".to_string());
        assert_eq!(source.new_guid(), source.new_guid());
    }
}
