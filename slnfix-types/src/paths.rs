//! Lexical path helpers.
//!
//! Build files and solution files always spell paths with backslashes. Nothing here touches the
//! filesystem.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Rewrites the build-file delimiter (`\`) to the host separator.
pub fn fix_up_delimiter(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '\\' {
        path.to_string()
    } else {
        path.replace('\\', std::path::MAIN_SEPARATOR_STR)
    }
}

/// Collapses `.` and `..` segments without consulting the filesystem.
///
/// `..` at the root of an absolute path is dropped; in a relative path it is kept.
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_str()).collect()
}

/// Resolves a path recorded in a build or solution file against `base_dir`.
pub fn resolve_relative(base_dir: &Utf8Path, relative: &str) -> Utf8PathBuf {
    let fixed = fix_up_delimiter(relative);
    normalize(&base_dir.join(fixed))
}

/// Computes the backslash-delimited path of `to_file` relative to `from_dir`.
///
/// Components compare case-insensitively. When the two paths share no root (different drives),
/// the absolute target path is returned.
pub fn relative_path_between(from_dir: &Utf8Path, to_file: &Utf8Path) -> String {
    let from = normalize(from_dir);
    let to = normalize(to_file);
    let from_parts: Vec<&str> = from.components().map(|c| c.as_str()).collect();
    let to_parts: Vec<&str> = to.components().map(|c| c.as_str()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a.to_lowercase() == b.to_lowercase())
        .count();

    if common == 0 && (from.is_absolute() || to.is_absolute()) {
        return to.as_str().replace('/', "\\");
    }

    let mut segments: Vec<&str> = Vec::new();
    segments.extend(std::iter::repeat_n("..", from_parts.len() - common));
    segments.extend(to_parts[common..].iter().copied());
    segments.join("\\")
}
