//! Error types for promptmine.
//!
//! This module defines a hierarchical error taxonomy using `thiserror`. Domain errors compose
//! into [`AppError`] via `From`, so orchestration code propagates everything with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for one version run or one subcommand
//!   - [`InputError`] - Trace log discovery and reading failures
//!   - [`SelectionError`] - No record survived the selection tiers
//!   - [`FetchError`] - Package listing, download or extraction failures
//!   - [`TraceError`] - The external tracing wrapper failed
//!   - [`ConfigError`](crate::config::ConfigError) / [`LoggingError`](crate::logging::LoggingError)
//!
//! # Recovery Strategy
//!
//! [`ParseError`]s are **non-fatal** and never reach [`AppError`]: malformed lines are logged,
//! kept as [`MalformedEntry`](crate::model::MalformedEntry) values and skipped. A binary that could
//! not be patched is a warning unless no override binary was given. Everything else is fatal for
//! the version being processed.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to locate or read the captured trace log.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The captured log holds no conversational request.
    #[error("Failed to select a request: {0}")]
    Selection(#[from] SelectionError),

    /// Package listing, download or unpacking failed.
    #[error("Failed to fetch package: {0}")]
    Fetch(#[from] FetchError),

    /// The tracing wrapper failed to run the binary.
    #[error("Failed to trace binary: {0}")]
    Trace(#[from] TraceError),

    /// The version guard was not found and no override binary was supplied.
    ///
    /// **Recovery**: rerun with `--binary` pointing at a binary that runs as-is.
    #[error("Version guard not found in package source for version {version}")]
    PatchFailed {
        /// Package version whose source could not be patched.
        version: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Generic I/O failure (report writing, patch write-back).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when locating or reading a trace log.
#[derive(Debug, Error)]
pub enum InputError {
    /// The given log file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use promptmine::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// The tracer ran but left no `*.jsonl` log behind.
    #[error("No trace log found in {dir}")]
    NoTraceLog {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// `extract -` was given but stdin is an interactive terminal.
    #[error("No input source: provide a log path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading the log.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing one JSONL trace line.
///
/// Non-fatal: the parser records these as malformed entries and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line is not valid JSON, or its shape does not match a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptmine::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "expected value".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number in the log.
        line: usize,
        /// The `serde_json` error message.
        message: String,
    },

    /// The JSON is well-formed but a required field is missing.
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// 1-based line number in the log.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}

/// Errors from request selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Every record was excluded: the log only contains housekeeping calls, or nothing at all.
    #[error("No suitable request among {candidates} captured record(s)")]
    NoSuitableRequest {
        /// Number of records that were inspected.
        candidates: usize,
    },
}

/// Errors from listing, downloading and unpacking a package version.
#[derive(Debug, Error)]
pub enum FetchError {
    /// An external command could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        /// Program that failed.
        program: String,
        /// Its exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The unpacked package does not contain the expected entry point.
    #[error("Package entry point missing: {path}")]
    MissingEntryPoint {
        /// Expected entry point path.
        path: PathBuf,
    },

    /// The registry's version list could not be understood.
    #[error("Invalid version list: {message}")]
    InvalidVersionList {
        /// Parser error or description of the unexpected output.
        message: String,
    },

    /// `npm pack` succeeded but did not name the tarball it wrote.
    #[error("npm pack printed no tarball name for {spec}")]
    MissingTarball {
        /// The `package@version` that was packed.
        spec: String,
    },
}

/// Errors from running the external tracing wrapper.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The tracer could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The tracer was configured with an empty command line.
    #[error("Tracer command is empty")]
    EmptyCommand,

    /// The tracer exited unsuccessfully.
    #[error("Tracer exited with {status}: {stderr}")]
    CommandFailed {
        /// Its exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}
