//! Embeddable core library for slnfix.
//!
//! Provides a clap-free, I/O-abstracted entry point for keeping solution files in sync with the
//! reference closure of the projects they list.
//!
//! # Ports
//!
//! Reads go through [`FileView`](slnfix_domain::FileView); the single write per solution goes
//! through [`WritePort`](ports::WritePort). The [`adapters`] module provides filesystem-backed
//! implementations.
//!
//! # Entry points
//!
//! - [`update_solution`](pipeline::update_solution): one solution, sequential
//! - [`run`](pipeline::run): discovery plus a worker pool over every solution under a target

pub mod adapters;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::RunError;
pub use pipeline::{RunCounters, SolutionOutcome, UpdateContext, run, update, update_solution};
pub use settings::{RunMode, RunSettings, UpdateSettings};

// Re-exported so embedders don't need slnfix-domain directly.
pub use slnfix_domain::{FileView, FixedGuid, FsFileView, GuidSource, MemoryFileView, RandomGuids};
