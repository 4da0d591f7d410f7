//! Trace log input sources.
//!
//! - File loading for a log path, or discovery of the newest log in a trace directory
//! - Stdin for piped input
//! - Unified InputSource enum for both

use crate::model::error::InputError;
use crate::parser::{parse_log, ParsedLog};
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::{find_latest_trace_log, read_log_file, TRACE_DIR_NAME};
pub use stdin::read_stdin;

/// Where a trace log comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A log file on disk
    File(PathBuf),
    /// Piped stdin
    Stdin,
}

impl InputSource {
    /// Read and parse the whole log.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the log cannot be read. Malformed lines are
    /// not errors; they end up in [`ParsedLog::malformed`].
    pub fn load(&self) -> Result<ParsedLog, InputError> {
        let text = match self {
            InputSource::File(path) => read_log_file(path)?,
            InputSource::Stdin => read_stdin()?,
        };
        Ok(parse_log(&text))
    }
}

/// Map a CLI path argument to an input source; `-` means stdin.
pub fn detect_input_source(path: PathBuf) -> InputSource {
    if path.as_os_str() == "-" {
        InputSource::Stdin
    } else {
        InputSource::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(detect_input_source(PathBuf::from("-")), InputSource::Stdin);
    }

    #[test]
    fn other_paths_are_files() {
        assert_eq!(
            detect_input_source(PathBuf::from("trace.jsonl")),
            InputSource::File(PathBuf::from("trace.jsonl"))
        );
    }

    #[test]
    fn load_parses_file_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let content = concat!(
            r#"{"request":{"model":"claude-sonnet-4","messages":[{"role":"user","content":"First"}]}}"#,
            "\n",
            "broken\n",
        );
        fs::write(&path, content).unwrap();

        let parsed = InputSource::File(path).load().unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.malformed.len(), 1);
    }

    #[test]
    fn load_missing_file_is_error() {
        let source = InputSource::File(PathBuf::from("/nonexistent/trace.jsonl"));
        assert!(matches!(source.load(), Err(InputError::FileNotFound { .. })));
    }
}
