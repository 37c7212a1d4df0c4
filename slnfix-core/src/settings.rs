//! Clap-free settings for the update pipeline.

use camino::Utf8PathBuf;

pub use slnfix_types::report::RunMode;

/// Per-solution behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Do not follow project references that carry (or sit under) a `Condition`.
    pub filter_conditional_references: bool,
    /// Render a unified diff of every change, including in validate mode.
    pub preview: bool,
}

/// Settings for a whole run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// A single solution file or a directory searched recursively.
    pub target: Utf8PathBuf,
    pub mode: RunMode,
    pub update: UpdateSettings,

    // Discovery
    pub ignore_file: Option<Utf8PathBuf>,
    pub ignore_patterns: Vec<String>,

    /// Worker threads; 0 lets the pool pick one per CPU.
    pub jobs: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            target: Utf8PathBuf::from("."),
            mode: RunMode::Validate,
            update: UpdateSettings::default(),
            ignore_file: None,
            ignore_patterns: Vec::new(),
            jobs: 0,
        }
    }
}
