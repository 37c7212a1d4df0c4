use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by slnfix.
    PrintSchemas,
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Validate every fixture's AllProjects.sln with the slnfix binary; each must be clean.
    CheckFixtures {
        #[arg(long, default_value = "tests/fixtures")]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", slnfix_types::schema::SLNFIX_REPORT_V1);
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "slnfix-core", "--test", "golden_fixtures"])
                .env("SLNFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::CheckFixtures { dir } => {
            let mut solutions = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let sln = entry?.path().join("AllProjects.sln");
                if sln.is_file() {
                    solutions.push(sln);
                }
            }
            solutions.sort();
            if solutions.is_empty() {
                anyhow::bail!("no AllProjects.sln under {}", dir.display());
            }
            for sln in &solutions {
                let status = ProcessCommand::new("cargo")
                    .args(["run", "-q", "-p", "slnfix", "--", "validate"])
                    .arg(sln)
                    .status()
                    .with_context(|| format!("run slnfix validate {}", sln.display()))?;
                if !status.success() {
                    anyhow::bail!("{} is missing projects", sln.display());
                }
            }
            println!("{} fixture solution(s) clean", solutions.len());
        }
    }
    Ok(())
}
