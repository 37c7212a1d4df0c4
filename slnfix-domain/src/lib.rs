//! Analysis side of slnfix: reading build-project files, walking their reference graph and
//! modelling the solution that should list them.
//!
//! Everything here is read-only. File access goes through [`ports::FileView`] so the closure and
//! the planner can run against an in-memory tree in tests.

pub mod closure;
pub mod msbuild;
pub mod planner;
pub mod ports;
pub mod solution;

pub use closure::resolve_closure;
pub use msbuild::{MSBUILD_NAMESPACE, ProjectDocument};
pub use planner::{DEPENDENCIES_FOLDER, Planner, new_references};
pub use ports::{FileView, FixedGuid, FsFileView, GuidSource, MemoryFileView, RandomGuids};
pub use solution::{DependenciesFolder, LineEnding, SolutionDocument, SolutionEntry, line_text};
