#![no_main]

//! Fuzz target for solution file parsing.
//!
//! Parses arbitrary text as a `.sln` and, when that succeeds, renders it back and queries the
//! model. Nothing here may panic.

use camino::Utf8Path;
use libfuzzer_sys::fuzz_target;
use slnfix_domain::{DEPENDENCIES_FOLDER, FixedGuid, SolutionDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(doc) = SolutionDocument::parse(Utf8Path::new("/fuzz/Input.sln"), s) else {
        return;
    };

    let rendered = slnfix_edit::render_solution(doc.lines());
    assert!(rendered.starts_with('\u{feff}'));
    let body = s.strip_prefix('\u{feff}').unwrap_or(s);
    assert_eq!(rendered.strip_prefix('\u{feff}'), Some(body));

    // An unmodified document survives a second parse with the same entries.
    let reparsed = SolutionDocument::parse(Utf8Path::new("/fuzz/Input.sln"), &rendered)
        .expect("rendered solution parses");
    assert_eq!(reparsed.entries().len(), doc.entries().len());

    let _ = doc.projects();
    let _ = doc.configurations();
    let guids = FixedGuid("{00000000-0000-0000-0000-000000000000}".to_string());
    let _ = doc.dependencies_folder(DEPENDENCIES_FOLDER, &guids);
});
