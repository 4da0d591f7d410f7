//! Tracing subscriber initialization.
//!
//! Logs go to stderr by default, or to a file when one is configured so
//! long multi-version runs can be followed with `tail -f`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, with ANSI colors
    Stderr,
    /// Append to a file, without ANSI colors
    File(PathBuf),
}

impl LogTarget {
    /// File target when a path is configured, stderr otherwise.
    pub fn from_config(log_file_path: Option<&Path>) -> Self {
        match log_file_path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Stderr,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Respects RUST_LOG environment variable, defaults to "info" level.
/// For file targets the log directory is created if missing.
///
/// # Errors
///
/// Returns `LoggingError` if the subscriber was already initialized or the
/// log file location is unusable.
pub fn init(target: &LogTarget) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    // Respect RUST_LOG, default to "info"
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|_| LoggingError::SubscriberAlreadySet),
        LogTarget::File(log_path) => {
            let (directory, file_name) = prepare_log_file(log_path)?;
            let file_appender = tracing_appender::rolling::never(directory, file_name);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(file_appender)
                .with_ansi(false) // No ANSI colors in log files
                .try_init()
                .map_err(|_| LoggingError::SubscriberAlreadySet)
        }
    }
}

/// Create the log directory and split the path into directory and file name.
fn prepare_log_file(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    Ok((directory, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn log_target_from_config() {
        assert_eq!(LogTarget::from_config(None), LogTarget::Stderr);
        assert_eq!(
            LogTarget::from_config(Some(Path::new("/tmp/p.log"))),
            LogTarget::File(PathBuf::from("/tmp/p.log"))
        );
    }

    #[test]
    fn prepare_log_file_creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let log_file = temp.path().join("nested").join("promptmine.log");

        let (directory, file_name) = prepare_log_file(&log_file).unwrap();

        assert!(directory.exists(), "Log directory should be created");
        assert_eq!(file_name, "promptmine.log");
    }

    #[test]
    fn prepare_log_file_rejects_path_without_file_name() {
        let result = prepare_log_file(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }

    #[test]
    #[serial(tracing_init)]
    fn init_file_target_creates_log_directory() {
        let temp = tempfile::tempdir().unwrap();
        let test_dir = temp.path().join("logs");
        let log_file = test_dir.join("test.log");

        // May fail if subscriber already set, which is fine
        let _ = init(&LogTarget::File(log_file));

        assert!(
            test_dir.exists(),
            "Log directory should be created: {:?}",
            test_dir
        );
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let _ = init(&LogTarget::Stderr);
        let second = init(&LogTarget::Stderr);
        assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));
    }
}
