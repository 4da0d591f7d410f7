//! promptmine - Entry Point

use chrono::Utc;
use clap::{Parser, Subcommand};
use promptmine::config::{CliOverrides, ResolvedConfig};
use promptmine::logging::LogTarget;
use promptmine::model::AppError;
use promptmine::patcher::BraceScanNeutralizer;
use promptmine::pipeline::{self, Pipeline, VersionOutcome, VersionSelection};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Recover system prompts and tool definitions from agent releases
#[derive(Parser, Debug)]
#[command(name = "promptmine")]
#[command(version)]
#[command(about = "Document the system prompt and tools of each released agent version")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Download, patch and trace versions, writing one report per version
    Capture(CaptureArgs),
    /// Write a report from an existing trace log
    Extract(ExtractArgs),
    /// Neutralize the version guard of a bundle in place
    Patch(PatchArgs),
}

/// Arguments of `capture`.
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct CaptureArgs {
    /// Versions to capture (default: the latest published version)
    #[arg(conflicts_with_all = ["all", "latest"])]
    pub versions: Vec<String>,

    /// Capture every published version
    #[arg(long, conflicts_with = "latest")]
    pub all: bool,

    /// Capture the N most recent versions
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub latest: Option<u64>,

    /// Binary to trace when a version's guard cannot be patched
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Overwrite existing reports
    #[arg(long)]
    pub force: bool,

    /// Keep each version's work directory
    #[arg(long)]
    pub keep_temp: bool,

    /// Prompt sent to the traced agent
    #[arg(long)]
    pub prompt: Option<String>,

    /// npm package to capture
    #[arg(long)]
    pub package: Option<String>,

    /// Directory reports are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl CaptureArgs {
    fn selection(&self) -> VersionSelection {
        if !self.versions.is_empty() {
            VersionSelection::Explicit(self.versions.clone())
        } else if self.all {
            VersionSelection::All
        } else {
            let n = self.latest.unwrap_or(1);
            VersionSelection::Latest(usize::try_from(n).unwrap_or(usize::MAX))
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            package: self.package.clone(),
            prompt: self.prompt.clone(),
            output_dir: self.output_dir.clone(),
            keep_temp: self.keep_temp.then_some(true),
        }
    }
}

/// Arguments of `extract`.
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct ExtractArgs {
    /// Trace log (JSONL), or `-` for stdin
    pub log: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Version label for the report title (default: the log's file stem)
    #[arg(long = "version-label", value_name = "LABEL")]
    pub version: Option<String>,
}

/// Arguments of `patch`.
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct PatchArgs {
    /// Bundle to patch in place
    pub file: PathBuf,

    /// Text identifying the guard function
    #[arg(long)]
    pub marker: Option<String>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = promptmine::config::load_config_with_precedence(args.config.clone())?;
    let merged = promptmine::config::merge_config(config_file);
    let with_env = promptmine::config::apply_env_overrides(merged);
    let overrides = match &args.command {
        Command::Capture(capture) => capture.overrides(),
        _ => CliOverrides::default(),
    };
    Ok(promptmine::config::apply_cli_overrides(with_env, overrides))
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    let config = resolve_config(&args)?;

    promptmine::logging::init(&LogTarget::from_config(config.log_file_path.as_deref()))?;

    info!(config = ?config, "Configuration loaded and resolved");

    match args.command {
        Command::Capture(capture) => run_capture(config, &capture),
        Command::Extract(extract) => run_extract(&config, &extract),
        Command::Patch(patch) => run_patch(&config, &patch),
    }
}

fn run_capture(config: ResolvedConfig, args: &CaptureArgs) -> Result<ExitCode, AppError> {
    let pipeline = Pipeline::new(config)
        .with_fallback_binary(args.binary.clone())
        .with_force(args.force);

    let versions = pipeline.resolve_versions(&args.selection())?;
    if versions.is_empty() {
        warn!("No versions to capture");
        return Ok(ExitCode::SUCCESS);
    }
    info!(count = versions.len(), "Capturing versions");

    let summary = pipeline.run_all(&versions);
    for (version, outcome) in &summary.completed {
        match outcome {
            VersionOutcome::Written { path, tools } => {
                println!("{version}: wrote {} ({tools} tools)", path.display());
            }
            VersionOutcome::Skipped { path } => {
                println!("{version}: skipped, {} exists", path.display());
            }
        }
    }
    for (version, error) in &summary.failed {
        eprintln!("{version}: failed: {error}");
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_extract(config: &ResolvedConfig, args: &ExtractArgs) -> Result<ExitCode, AppError> {
    let parsed = promptmine::source::detect_input_source(args.log.clone()).load()?;
    let label = args
        .version
        .clone()
        .unwrap_or_else(|| version_label(&args.log));

    let mined = pipeline::mine_log(&parsed, config, &label, Utc::now())?;
    info!(
        line = mined.line_number,
        tools = mined.prompt.tools.len(),
        skipped_lines = parsed.malformed.len(),
        "Selected request"
    );

    match &args.output {
        Some(path) => std::fs::write(path, &mined.markdown)?,
        None => print!("{}", mined.markdown),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_patch(config: &ResolvedConfig, args: &PatchArgs) -> Result<ExitCode, AppError> {
    let marker = args.marker.as_deref().unwrap_or(&config.patch_marker);
    let result = pipeline::patch_file(&args.file, &BraceScanNeutralizer, marker)?;

    if result.patched {
        println!("patched {}", args.file.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("guard not found in {}", args.file.display());
        Ok(ExitCode::FAILURE)
    }
}

/// Report title label for a log without an explicit one.
fn version_label(log: &Path) -> String {
    log.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| *stem != "-")
        .unwrap_or("unknown")
        .to_string()
}
