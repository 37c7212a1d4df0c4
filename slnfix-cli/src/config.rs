//! Configuration file loading for slnfix.
//!
//! Discovers and loads `slnfix.toml` next to the run target.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "slnfix.toml";

/// Top-level configuration from slnfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlnfixConfig {
    pub update: UpdateConfig,
    pub discovery: DiscoveryConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Skip project references that carry (or sit under) a `Condition`.
    pub filter_conditional_references: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Ignore pattern file, relative to the config file.
    pub ignore_file: Option<Utf8PathBuf>,

    /// Inline ignore patterns (regular expressions).
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads; 0 means one per CPU.
    pub jobs: Option<usize>,
}

/// A parsed config together with the directory relative paths are resolved against.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: SlnfixConfig,
    pub base_dir: Option<Utf8PathBuf>,
}

/// Directory searched for `slnfix.toml`: the target itself, or the directory holding a target
/// solution file.
fn config_dir(target: &Utf8Path) -> &Utf8Path {
    if target.is_file() {
        target.parent().unwrap_or(Utf8Path::new("."))
    } else {
        target
    }
}

/// Discover the slnfix.toml config file for `target`.
pub fn discover_config(target: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = config_dir(target).join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a slnfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<LoadedConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let config = parse_config(&contents).with_context(|| format!("parse config file {}", path))?;
    Ok(LoadedConfig {
        config,
        base_dir: path.parent().map(Utf8Path::to_path_buf),
    })
}

pub fn parse_config(contents: &str) -> anyhow::Result<SlnfixConfig> {
    let config: SlnfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Loads `explicit` if given, else the discovered config, else defaults.
pub fn load_or_default(
    target: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<LoadedConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => match discover_config(target) {
            Some(path) => load_config(&path),
            None => Ok(LoadedConfig::default()),
        },
    }
}

/// Configuration after CLI arguments have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    pub filter_conditional_references: bool,
    pub ignore_file: Option<Utf8PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub jobs: usize,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    loaded: LoadedConfig,
}

impl ConfigMerger {
    pub fn new(loaded: LoadedConfig) -> Self {
        Self { loaded }
    }

    /// Boolean flags OR with the config; `--ignore-file` and `--jobs` replace configured values.
    pub fn merge_run_args(
        self,
        cli_filter_conditional_references: bool,
        cli_ignore_file: Option<&Utf8Path>,
        cli_jobs: Option<usize>,
    ) -> MergedConfig {
        let LoadedConfig { config, base_dir } = self.loaded;

        let ignore_file = match cli_ignore_file {
            Some(path) => Some(path.to_path_buf()),
            None => config.discovery.ignore_file.map(|path| match &base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            }),
        };

        MergedConfig {
            filter_conditional_references: cli_filter_conditional_references
                || config.update.filter_conditional_references,
            ignore_file,
            ignore_patterns: config.discovery.ignore,
            jobs: cli_jobs.or(config.run.jobs).unwrap_or(0),
        }
    }
}
