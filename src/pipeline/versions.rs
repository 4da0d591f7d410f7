//! Published version discovery.

use crate::model::FetchError;
use std::process::Command;
use tracing::debug;

/// Which versions a capture run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelection {
    /// Exactly these versions, in the given order
    Explicit(Vec<String>),
    /// Every published version
    All,
    /// The last `n` published versions
    Latest(usize),
}

impl VersionSelection {
    /// Whether resolving this selection needs the registry's version list.
    pub fn needs_registry(&self) -> bool {
        !matches!(self, Self::Explicit(_))
    }

    /// Resolve against the registry's version list (oldest first).
    pub fn resolve(&self, published: &[String]) -> Vec<String> {
        match self {
            Self::Explicit(versions) => versions.clone(),
            Self::All => published.to_vec(),
            Self::Latest(n) => published[published.len().saturating_sub(*n)..].to_vec(),
        }
    }
}

/// Ask npm for every published version of `package`, oldest first.
///
/// # Errors
///
/// Returns `FetchError` if npm cannot be run, fails, or prints something
/// other than a version list.
pub fn list_versions(npm: &str, package: &str) -> Result<Vec<String>, FetchError> {
    let output = Command::new(npm)
        .args(["view", package, "versions", "--json"])
        .output()
        .map_err(|source| FetchError::Spawn {
            program: npm.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(FetchError::CommandFailed {
            program: npm.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let versions = parse_version_list(&String::from_utf8_lossy(&output.stdout))?;
    debug!(package, count = versions.len(), "Listed published versions");
    Ok(versions)
}

/// Parse `npm view <pkg> versions --json` output.
///
/// npm prints a JSON array, or a bare JSON string when only one version
/// has been published.
///
/// # Errors
///
/// Returns `FetchError::InvalidVersionList` for anything else.
pub fn parse_version_list(stdout: &str) -> Result<Vec<String>, FetchError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RawVersions {
        Many(Vec<String>),
        One(String),
    }

    let raw: RawVersions =
        serde_json::from_str(stdout.trim()).map_err(|e| FetchError::InvalidVersionList {
            message: e.to_string(),
        })?;

    Ok(match raw {
        RawVersions::Many(versions) => versions,
        RawVersions::One(version) => vec![version],
    })
}
