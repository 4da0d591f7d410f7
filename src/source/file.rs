//! File-based trace log access.
//!
//! The tracing wrapper writes one `*.jsonl` file per run into a trace
//! directory under its working directory. We read the newest one.

use crate::model::error::InputError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Directory the tracer writes its logs into, relative to its working directory.
pub const TRACE_DIR_NAME: &str = ".claude-trace";

const LOG_EXTENSION: &str = "jsonl";

/// Read a whole log file.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::Io` for other I/O errors.
pub fn read_log_file(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Find the most recently modified `*.jsonl` file in `dir`.
///
/// Ties on modification time go to the lexicographically greatest name;
/// the tracer embeds a timestamp in its file names.
///
/// # Errors
///
/// Returns `InputError::NoTraceLog` if `dir` is missing or holds no log.
/// Returns `InputError::Io` if the directory cannot be listed.
pub fn find_latest_trace_log(dir: &Path) -> Result<PathBuf, InputError> {
    if !dir.is_dir() {
        return Err(InputError::NoTraceLog {
            dir: dir.to_path_buf(),
        });
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        let is_newer = match &newest {
            None => true,
            Some((best_time, best_path)) => (modified, &path) > (*best_time, best_path),
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }

    let (_, path) = newest.ok_or_else(|| InputError::NoTraceLog {
        dir: dir.to_path_buf(),
    })?;
    debug!(path = %path.display(), "Found trace log");
    Ok(path)
}
