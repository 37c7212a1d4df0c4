use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fs_err as fs;
use slnfix_cli::config::{self, ConfigMerger};
use slnfix_cli::output::{exit_code, render_text};
use slnfix_cli::tool_info;
use slnfix_core::adapters::FsWritePort;
use slnfix_core::{FsFileView, RandomGuids, RunMode, RunSettings, UpdateContext, UpdateSettings};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "slnfix",
    version,
    about = "Adds missing transitive project references to Visual Studio solution files."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert every missing transitively referenced project into the solutions.
    Update(RunArgs),
    /// Report solutions with missing projects without modifying them.
    ///
    /// Exits with the number of solutions that would change (0 means clean).
    Validate(RunArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// A solution file, or a directory searched recursively for *.sln.
    target: Utf8PathBuf,

    /// Do not follow project references guarded by an MSBuild Condition.
    #[arg(long, default_value_t = false)]
    filter_conditional_references: bool,

    /// File with one ignore regex per line (`#` starts a comment).
    #[arg(long)]
    ignore_file: Option<Utf8PathBuf>,

    /// Number of worker threads (default: one per CPU).
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Config file (default: slnfix.toml next to the target).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Write a JSON run report to this path.
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Print a unified diff of every change.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Update(args) => cmd_run(RunMode::Update, args),
        Command::Validate(args) => cmd_run(RunMode::Validate, args),
    }
}

fn cmd_run(mode: RunMode, args: RunArgs) -> anyhow::Result<ExitCode> {
    // Load config file and merge with CLI arguments
    let loaded = config::load_or_default(&args.target, args.config.as_deref())
        .context("load slnfix.toml config")?;
    let merged = ConfigMerger::new(loaded).merge_run_args(
        args.filter_conditional_references,
        args.ignore_file.as_deref(),
        args.jobs,
    );
    debug!(
        "merged config: filter_conditional_references={}, ignore_file={:?}, ignore={:?}, jobs={}",
        merged.filter_conditional_references, merged.ignore_file, merged.ignore_patterns, merged.jobs
    );

    let settings = RunSettings {
        target: args.target.clone(),
        mode,
        update: UpdateSettings {
            filter_conditional_references: merged.filter_conditional_references,
            preview: args.diff,
        },
        ignore_file: merged.ignore_file,
        ignore_patterns: merged.ignore_patterns,
        jobs: merged.jobs,
    };

    let guids = RandomGuids;
    let ctx = UpdateContext {
        files: &FsFileView,
        writer: &FsWritePort,
        guids: &guids,
    };
    let report = slnfix_core::run(&settings, &ctx, tool_info())
        .with_context(|| format!("{} {}", mode_name(mode), args.target))?;

    if let Some(path) = &args.report {
        write_json(path, &report)?;
        info!("wrote report to {}", path);
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report, args.diff)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }

    Ok(ExitCode::from(exit_code(&report)))
}

fn mode_name(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Update => "update",
        RunMode::Validate => "validate",
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}
