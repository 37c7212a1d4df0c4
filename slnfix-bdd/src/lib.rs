//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates. The helpers here
//! stage fixture trees in temp dirs so scenarios can mutate them freely.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tempfile::TempDir;

/// The shared `tests/fixtures` directory at the workspace root.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("tests")
        .join("fixtures")
}

pub fn copy_dir(src: &Utf8Path, dst: &Utf8Path) -> anyhow::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let from = Utf8PathBuf::from_path_buf(entry?.path())
            .map_err(|p| anyhow::anyhow!("non-UTF-8 fixture path {}", p.display()))?;
        let name = from
            .file_name()
            .with_context(|| format!("fixture entry without a name: {from}"))?;
        let to = dst.join(name);
        if from.is_dir() {
            copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

/// Copies the named fixture into a fresh temp dir; the dir lives as long as the returned guard.
pub fn stage_fixture(name: &str) -> anyhow::Result<(TempDir, Utf8PathBuf)> {
    let td = tempfile::tempdir().context("create temp dir")?;
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf())
        .map_err(|p| anyhow::anyhow!("non-UTF-8 temp dir {}", p.display()))?;
    copy_dir(&fixtures_dir().join(name), &root)
        .with_context(|| format!("stage fixture {name}"))?;
    Ok((td, root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_fixture_contains_solutions() {
        let (_td, root) = stage_fixture("SimpleDependency").unwrap();
        assert!(root.join("AllProjects.sln").is_file());
        assert!(root.join("A").join("A.csproj").is_file());
    }
}
