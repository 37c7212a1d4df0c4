#![no_main]

//! Fuzz target for the three solution mutation passes.
//!
//! Every original line must survive, in order and with its own terminator (an unterminated
//! last line may gain one), and exactly the inserted lines (plus any section header/footer
//! pairs) are added.

use arbitrary::Arbitrary;
use camino::Utf8Path;
use libfuzzer_sys::fuzz_target;
use slnfix_domain::{LineEnding, line_text};
use slnfix_edit::{insert_configurations, insert_nested_projects, insert_project_blocks};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    crlf: bool,
    blocks: Vec<String>,
    mappings: Vec<String>,
    configurations: Vec<String>,
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut it = haystack.iter();
    let last = needle.len().saturating_sub(1);
    needle.iter().enumerate().all(|(i, n)| {
        it.any(|h| h == n || (i == last && !n.ends_with('\n') && line_text(h) == n.as_str()))
    })
}

fuzz_target!(|input: Input| {
    let path = Utf8Path::new("/fuzz/Input.sln");
    let eol = if input.crlf { LineEnding::CrLf } else { LineEnding::Lf };
    let original: Vec<String> = input.text.split_inclusive('\n').map(str::to_string).collect();
    let inserted = input.blocks.len() + input.mappings.len() + input.configurations.len();

    let Ok(lines) = insert_project_blocks(path, original.clone(), input.blocks, eol) else {
        return;
    };
    let Ok(lines) = insert_nested_projects(path, lines, input.mappings, eol) else {
        return;
    };
    let Ok(lines) = insert_configurations(path, lines, input.configurations, eol) else {
        return;
    };

    assert!(is_subsequence(&original, &lines));
    let added = lines.len() - original.len();
    assert!(added == inserted || added == inserted + 2 || added == inserted + 4);
});
