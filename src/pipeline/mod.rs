//! Per-version capture orchestration.
//!
//! For each version: download the package, neutralize its version guard,
//! run it once under the tracer, then mine the trace log into a Markdown
//! report. Versions run sequentially, and every path a step needs comes
//! from its [`VersionContext`] rather than the process working directory.

pub mod fetch;
pub mod trace;
pub mod versions;

use crate::config::ResolvedConfig;
use crate::extract::ExtractedPrompt;
use crate::model::{AppError, FetchError, PatchResult, SelectionError};
use crate::parser::{parse_log, ParsedLog};
use crate::patcher::{BraceScanNeutralizer, GuardNeutralizer};
use crate::report::render_markdown;
use crate::selection::Selector;
use crate::source::{find_latest_trace_log, read_log_file, TRACE_DIR_NAME};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{error, info, warn};

pub use versions::VersionSelection;

/// Working directory of one version's capture.
#[derive(Debug)]
enum WorkDir {
    /// Removed when the context is dropped
    Temporary(TempDir),
    /// Left on disk for inspection
    Kept(PathBuf),
}

/// Everything a capture step needs to know about the version it works on.
#[derive(Debug)]
pub struct VersionContext {
    version: String,
    work_dir: WorkDir,
}

impl VersionContext {
    /// Create a fresh work directory for `version`.
    ///
    /// With `keep`, the directory survives the context and its path is logged.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the temporary directory cannot be created.
    pub fn create(version: impl Into<String>, keep: bool) -> io::Result<Self> {
        let version = version.into();
        let temp = tempfile::Builder::new()
            .prefix(&format!("promptmine-{version}-"))
            .tempdir()?;

        let work_dir = if keep {
            let path = temp.keep();
            info!(version = %version, path = %path.display(), "Keeping work directory");
            WorkDir::Kept(path)
        } else {
            WorkDir::Temporary(temp)
        };

        Ok(Self { version, work_dir })
    }

    /// Version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory the package is unpacked into and the tracer runs in.
    pub fn work_dir(&self) -> &Path {
        match &self.work_dir {
            WorkDir::Temporary(temp) => temp.path(),
            WorkDir::Kept(path) => path,
        }
    }

    /// Directory the tracer writes its logs into.
    pub fn trace_dir(&self) -> PathBuf {
        self.work_dir().join(TRACE_DIR_NAME)
    }
}

/// What happened to one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// A report was written
    Written {
        /// Report path
        path: PathBuf,
        /// Number of documented tools
        tools: usize,
    },
    /// A report already existed and `force` was off
    Skipped {
        /// Existing report path
        path: PathBuf,
    },
}

/// Result of mining one trace log.
#[derive(Debug, Clone)]
pub struct MinedReport {
    /// Extracted fields of the selected request
    pub prompt: ExtractedPrompt,
    /// Rendered Markdown
    pub markdown: String,
    /// Log line of the selected request
    pub line_number: usize,
}

/// Select, extract and render from an already parsed log.
///
/// # Errors
///
/// Returns `SelectionError::NoSuitableRequest` if no record qualifies.
pub fn mine_log(
    parsed: &ParsedLog,
    config: &ResolvedConfig,
    version: &str,
    generated_at: DateTime<Utc>,
) -> Result<MinedReport, SelectionError> {
    let selector = Selector::new(config.lightweight_marker.clone());
    let record = selector.select_best(&parsed.records)?;
    let prompt = ExtractedPrompt::from_record(record, &config.reserved_tool_prefix);
    let markdown = render_markdown(&config.package, version, &prompt, generated_at);

    Ok(MinedReport {
        prompt,
        markdown,
        line_number: record.line_number(),
    })
}

/// Neutralize the guard in the file at `path`, rewriting it only if patched.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read or written.
pub fn patch_file(
    path: &Path,
    neutralizer: &dyn GuardNeutralizer,
    marker: &str,
) -> io::Result<PatchResult> {
    let text = fs::read_to_string(path)?;
    let result = neutralizer.neutralize(&text, marker);
    if result.patched {
        fs::write(path, &result.content)?;
    }
    Ok(result)
}

/// Where the report for `version` goes.
pub fn report_path(output_dir: &Path, version: &str) -> PathBuf {
    output_dir.join(format!("{version}.md"))
}

/// Tally of a multi-version capture.
#[derive(Debug, Default)]
pub struct CaptureSummary {
    /// Outcome of each version that finished
    pub completed: Vec<(String, VersionOutcome)>,
    /// Versions that failed, with their error
    pub failed: Vec<(String, AppError)>,
}

impl CaptureSummary {
    /// Whether every version completed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Capture driver holding the resolved configuration.
pub struct Pipeline {
    config: ResolvedConfig,
    fallback_binary: Option<PathBuf>,
    force: bool,
    neutralizer: Box<dyn GuardNeutralizer>,
}

impl Pipeline {
    /// Pipeline using the brace-scan neutralizer.
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            fallback_binary: None,
            force: false,
            neutralizer: Box::new(BraceScanNeutralizer),
        }
    }

    /// Binary to trace when a version's guard cannot be patched.
    pub fn with_fallback_binary(mut self, binary: Option<PathBuf>) -> Self {
        self.fallback_binary = binary;
        self
    }

    /// Overwrite existing reports.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Replace the guard neutralizer.
    pub fn with_neutralizer(mut self, neutralizer: impl GuardNeutralizer + 'static) -> Self {
        self.neutralizer = Box::new(neutralizer);
        self
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Turn a selection into concrete versions, asking npm only if needed.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the registry cannot be queried.
    pub fn resolve_versions(&self, selection: &VersionSelection) -> Result<Vec<String>, FetchError> {
        let published = if selection.needs_registry() {
            versions::list_versions(&self.config.npm_command, &self.config.package)?
        } else {
            Vec::new()
        };
        Ok(selection.resolve(&published))
    }

    /// Capture every version in order. A failed version is logged and
    /// recorded; the remaining versions still run.
    pub fn run_all(&self, versions: &[String]) -> CaptureSummary {
        let mut summary = CaptureSummary::default();
        for version in versions {
            match self.run_version(version) {
                Ok(outcome) => summary.completed.push((version.clone(), outcome)),
                Err(e) => {
                    error!(version = %version, error = %e, "Capture failed");
                    summary.failed.push((version.clone(), e));
                }
            }
        }
        summary
    }

    /// Capture one version end to end.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on the first failing step. An unpatched guard is
    /// only an error when no fallback binary is configured.
    pub fn run_version(&self, version: &str) -> Result<VersionOutcome, AppError> {
        let path = report_path(&self.config.output_dir, version);
        if path.exists() && !self.force {
            info!(version, path = %path.display(), "Report exists, skipping");
            return Ok(VersionOutcome::Skipped { path });
        }

        let ctx = VersionContext::create(version, self.config.keep_temp)?;
        let binary = self.prepare_binary(&ctx)?;

        trace::run_tracer(
            &self.config.tracer_command,
            &binary,
            &self.config.prompt,
            ctx.work_dir(),
        )?;

        let log_path = find_latest_trace_log(&ctx.trace_dir())?;
        let parsed = parse_log(&read_log_file(&log_path)?);
        let mined = mine_log(&parsed, &self.config, version, Utc::now())?;

        fs::create_dir_all(&self.config.output_dir)?;
        fs::write(&path, &mined.markdown)?;
        info!(
            version,
            path = %path.display(),
            tools = mined.prompt.tools.len(),
            line = mined.line_number,
            "Wrote report"
        );

        Ok(VersionOutcome::Written {
            path,
            tools: mined.prompt.tools.len(),
        })
    }

    /// Download the version and patch its entry point, falling back to the
    /// configured binary when the guard cannot be found.
    fn prepare_binary(&self, ctx: &VersionContext) -> Result<PathBuf, AppError> {
        let entry_point = fetch::fetch_package(
            &self.config.npm_command,
            &self.config.package,
            ctx.version(),
            ctx.work_dir(),
        )?;

        let result = patch_file(
            &entry_point,
            self.neutralizer.as_ref(),
            &self.config.patch_marker,
        )?;
        if result.patched {
            info!(version = ctx.version(), "Neutralized version guard");
            return Ok(entry_point);
        }

        match &self.fallback_binary {
            Some(binary) => {
                warn!(
                    version = ctx.version(),
                    binary = %binary.display(),
                    "Version guard not found, tracing fallback binary"
                );
                Ok(binary.clone())
            }
            None => Err(AppError::PatchFailed {
                version: ctx.version().to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
