#![no_main]

//! Fuzz target for MSBuild project parsing.

use libfuzzer_sys::fuzz_target;
use slnfix_domain::ProjectDocument;
use slnfix_types::ProjectPath;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let path = ProjectPath::from("/fuzz/A/A.csproj");
    let Ok(doc) = ProjectDocument::parse(&path, s) else {
        return;
    };

    let all = doc.direct_project_reference_paths(false);
    let unconditional = doc.direct_project_reference_paths(true);
    assert!(unconditional.is_subset(&all));

    let _ = doc.direct_runtime_references();
    let _ = doc.project_guid();
    let _ = doc.name();
});
