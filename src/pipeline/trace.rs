//! Running the agent under the HTTP tracing wrapper.

use crate::model::TraceError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Arguments appended to the configured tracer command.
///
/// The tracer records every request (not only conversation turns), runs
/// `binary` instead of a globally installed agent, and forwards
/// `-p <prompt>` so the agent answers once and exits.
pub fn tracer_args(binary: &Path, prompt: &str) -> Vec<OsString> {
    vec![
        "--include-all-requests".into(),
        "--claude-path".into(),
        binary.as_os_str().to_os_string(),
        "--run-with".into(),
        "-p".into(),
        prompt.into(),
    ]
}

/// Run `binary` under the tracer with `work_dir` as its working directory.
///
/// The tracer writes its log below `work_dir`; each version gets its own
/// directory so concurrent or repeated runs never read each other's logs.
///
/// # Errors
///
/// Returns `TraceError` if the command is empty, cannot be started, or
/// exits unsuccessfully.
pub fn run_tracer(
    tracer_command: &[String],
    binary: &Path,
    prompt: &str,
    work_dir: &Path,
) -> Result<(), TraceError> {
    let (program, base_args) = tracer_command
        .split_first()
        .ok_or(TraceError::EmptyCommand)?;

    info!(binary = %binary.display(), "Tracing agent run");
    let output = Command::new(program)
        .args(base_args)
        .args(tracer_args(binary, prompt))
        .current_dir(work_dir)
        .output()
        .map_err(|source| TraceError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(TraceError::CommandFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!(stdout_bytes = output.stdout.len(), "Tracer finished");
    Ok(())
}
