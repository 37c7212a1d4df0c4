use camino::Utf8PathBuf;
use fs_err as fs;
use slnfix_domain::FsFileView;
use slnfix_edit::{check_unchanged, sha256_hex};
use tempfile::TempDir;

fn temp_solution(contents: &str) -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let path = root.join("All.sln");
    fs::write(&path, contents).unwrap();
    (temp, path)
}

#[test]
fn unchanged_file_passes() {
    let (_temp, path) = temp_solution("\u{feff}Global\r\nEndGlobal\r\n");
    let sha = sha256_hex("\u{feff}Global\r\nEndGlobal\r\n".as_bytes());
    check_unchanged(&FsFileView, &path, &sha).unwrap();
}

#[test]
fn modified_file_is_a_concurrent_modification() {
    let (_temp, path) = temp_solution("Global\nEndGlobal\n");
    let sha = sha256_hex(b"Global\nEndGlobal\n");
    fs::write(&path, "Global\n\nEndGlobal\n").unwrap();
    let err = check_unchanged(&FsFileView, &path, &sha).unwrap_err();
    assert_eq!(err.kind(), "concurrent_modification");
}

#[test]
fn deleted_file_is_missing() {
    let (_temp, path) = temp_solution("Global\nEndGlobal\n");
    let sha = sha256_hex(b"Global\nEndGlobal\n");
    fs::remove_file(&path).unwrap();
    let err = check_unchanged(&FsFileView, &path, &sha).unwrap_err();
    assert_eq!(err.kind(), "missing_file");
}

#[test]
fn sha256_hex_is_lowercase_hex() {
    let sha = sha256_hex(b"");
    assert_eq!(sha, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
}
