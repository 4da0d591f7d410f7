//! Package download and unpacking.
//!
//! `npm pack` downloads the published tarball without installing anything;
//! `tar` unpacks it into the version's work directory.

use crate::model::FetchError;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Directory npm tarballs unpack into.
const PACKAGE_DIR: &str = "package";

/// Bundled entry point of the agent package.
const ENTRY_POINT: &str = "cli.js";

/// Download `package@version` into `dest` and return the unpacked entry point.
///
/// # Errors
///
/// Returns `FetchError` if npm or tar fail, or the entry point is missing.
pub fn fetch_package(
    npm: &str,
    package: &str,
    version: &str,
    dest: &Path,
) -> Result<PathBuf, FetchError> {
    let spec = format!("{package}@{version}");
    info!(package = %spec, "Downloading package");

    let packed = run(
        npm,
        Command::new(npm)
            .arg("pack")
            .arg(&spec)
            .arg("--pack-destination")
            .arg(dest)
            .current_dir(dest),
    )?;

    let stdout = String::from_utf8_lossy(&packed.stdout);
    let tarball = tarball_name(&stdout)
        .map(|name| dest.join(name))
        .ok_or_else(|| FetchError::MissingTarball { spec: spec.clone() })?;
    debug!(tarball = %tarball.display(), "Unpacking");

    run(
        "tar",
        Command::new("tar")
            .arg("-xzf")
            .arg(&tarball)
            .arg("-C")
            .arg(dest),
    )?;

    let entry_point = entry_point(dest);
    if !entry_point.is_file() {
        return Err(FetchError::MissingEntryPoint { path: entry_point });
    }
    Ok(entry_point)
}

/// Where the entry point lands after unpacking into `dest`.
pub fn entry_point(dest: &Path) -> PathBuf {
    dest.join(PACKAGE_DIR).join(ENTRY_POINT)
}

/// Tarball file name from `npm pack` stdout: its last non-empty line.
pub fn tarball_name(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
}

fn run(program: &str, command: &mut Command) -> Result<Output, FetchError> {
    let output = command.output().map_err(|source| FetchError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(FetchError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tarball_name_takes_last_non_empty_line() {
        let stdout = "npm notice package: @anthropic-ai/claude-code@1.0.0\nanthropic-ai-claude-code-1.0.0.tgz\n\n";
        assert_eq!(
            tarball_name(stdout),
            Some("anthropic-ai-claude-code-1.0.0.tgz")
        );
    }

    #[test]
    fn tarball_name_empty_output() {
        assert_eq!(tarball_name("\n  \n"), None);
    }

    #[test]
    fn entry_point_is_package_cli_js() {
        assert_eq!(
            entry_point(Path::new("/tmp/work")),
            PathBuf::from("/tmp/work/package/cli.js")
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let result = run(
            "promptmine-no-such-program",
            &mut Command::new("promptmine-no-such-program"),
        );
        assert!(matches!(result, Err(FetchError::Spawn { .. })));
    }
}
