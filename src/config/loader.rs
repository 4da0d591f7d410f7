//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::extract::DEFAULT_RESERVED_TOOL_PREFIX;
use crate::patcher::DEFAULT_GUARD_MARKER;
use crate::selection::DEFAULT_LIGHTWEIGHT_MARKER;

/// Default npm package to mine.
pub const DEFAULT_PACKAGE: &str = "@anthropic-ai/claude-code";

/// Default prompt sent to the traced binary.
pub const DEFAULT_PROMPT: &str = "Hello! What can you help me with?";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/promptmine/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// npm package name.
    #[serde(default)]
    pub package: Option<String>,

    /// Prompt passed to the traced binary.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Directory receiving one markdown report per version.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Text identifying the version guard function.
    #[serde(default)]
    pub patch_marker: Option<String>,

    /// Model name fragment marking housekeeping requests.
    #[serde(default)]
    pub lightweight_marker: Option<String>,

    /// Tool name prefix of external tools left out of reports.
    #[serde(default)]
    pub reserved_tool_prefix: Option<String>,

    /// Command line of the tracing wrapper, program first.
    #[serde(default)]
    pub tracer_command: Option<Vec<String>>,

    /// npm executable.
    #[serde(default)]
    pub npm_command: Option<String>,

    /// Keep per-version temp directories for inspection.
    #[serde(default)]
    pub keep_temp: Option<bool>,

    /// Write tracing output to this file instead of stderr.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// npm package name.
    pub package: String,
    /// Prompt passed to the traced binary.
    pub prompt: String,
    /// Report output directory.
    pub output_dir: PathBuf,
    /// Guard marker text.
    pub patch_marker: String,
    /// Lightweight model marker.
    pub lightweight_marker: String,
    /// Reserved tool prefix.
    pub reserved_tool_prefix: String,
    /// Tracer command line.
    pub tracer_command: Vec<String>,
    /// npm executable.
    pub npm_command: String,
    /// Keep temp directories.
    pub keep_temp: bool,
    /// Log file; `None` logs to stderr.
    pub log_file_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            output_dir: PathBuf::from("prompts"),
            patch_marker: DEFAULT_GUARD_MARKER.to_string(),
            lightweight_marker: DEFAULT_LIGHTWEIGHT_MARKER.to_string(),
            reserved_tool_prefix: DEFAULT_RESERVED_TOOL_PREFIX.to_string(),
            tracer_command: vec![
                "npx".to_string(),
                "--yes".to_string(),
                "@mariozechner/claude-trace".to_string(),
            ],
            npm_command: "npm".to_string(),
            keep_temp: false,
            log_file_path: None,
        }
    }
}

/// Overrides taken from command line flags.
///
/// `None` means the flag was not given and lower-precedence values stand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--package`
    pub package: Option<String>,
    /// `--prompt`
    pub prompt: Option<String>,
    /// `--output-dir`
    pub output_dir: Option<PathBuf>,
    /// `--keep-temp`
    pub keep_temp: Option<bool>,
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/promptmine/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("promptmine").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PROMPTMINE_CONFIG` environment variable
/// 3. Default path `~/.config/promptmine/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PROMPTMINE_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        package: config.package.unwrap_or(defaults.package),
        prompt: config.prompt.unwrap_or(defaults.prompt),
        output_dir: config.output_dir.unwrap_or(defaults.output_dir),
        patch_marker: config.patch_marker.unwrap_or(defaults.patch_marker),
        lightweight_marker: config
            .lightweight_marker
            .unwrap_or(defaults.lightweight_marker),
        reserved_tool_prefix: config
            .reserved_tool_prefix
            .unwrap_or(defaults.reserved_tool_prefix),
        tracer_command: config.tracer_command.unwrap_or(defaults.tracer_command),
        npm_command: config.npm_command.unwrap_or(defaults.npm_command),
        keep_temp: config.keep_temp.unwrap_or(defaults.keep_temp),
        log_file_path: config.log_file_path.or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `PROMPTMINE_PACKAGE`, `PROMPTMINE_PROMPT` and `PROMPTMINE_OUTPUT_DIR`.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(package) = std::env::var("PROMPTMINE_PACKAGE") {
        config.package = package;
    }

    if let Ok(prompt) = std::env::var("PROMPTMINE_PROMPT") {
        config.prompt = prompt;
    }

    if let Ok(dir) = std::env::var("PROMPTMINE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(package) = overrides.package {
        config.package = package;
    }

    if let Some(prompt) = overrides.prompt {
        config.prompt = prompt;
    }

    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }

    if let Some(keep) = overrides.keep_temp {
        config.keep_temp = keep;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
