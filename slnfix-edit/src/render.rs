use camino::Utf8Path;
use diffy::PatchFormatter;

const BOM: char = '\u{feff}';

/// Concatenates `lines` into the on-disk form: UTF-8 with BOM, every line with the terminator it
/// already carries.
pub fn render_solution(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(String::len).sum::<usize>() + 3);
    out.push(BOM);
    out.extend(lines.iter().map(String::as_str));
    out
}

/// Unified diff between two renderings of the same solution; empty when they are equal.
pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    let before = before.strip_prefix(BOM).unwrap_or(before);
    let after = after.strip_prefix(BOM).unwrap_or(after);
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    let patch = diffy::create_patch(before, after);
    out.push_str(&PatchFormatter::new().fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renders_bom_and_each_line_terminator() {
        let out = render_solution(&lines(&["\r\n", "Global\n", "EndGlobal\r\n"]));
        assert_eq!(out, "\u{feff}\r\nGlobal\nEndGlobal\r\n");
    }

    #[test]
    fn keeps_missing_trailing_newline() {
        let out = render_solution(&lines(&["Global\n", "EndGlobal"]));
        assert_eq!(out, "\u{feff}Global\nEndGlobal");
    }

    #[test]
    fn patch_ignores_bom_and_is_empty_for_equal_text() {
        let path = Utf8Path::new("All.sln");
        assert_eq!(render_patch(path, "\u{feff}Global\n", "Global\n"), "");

        let patch = render_patch(path, "Global\nEndGlobal\n", "Project\nGlobal\nEndGlobal\n");
        assert!(patch.starts_with("diff --git a/All.sln b/All.sln\n"));
        assert!(patch.contains("+Project\n"));
    }
}
