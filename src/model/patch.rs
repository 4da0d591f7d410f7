//! Outcome of patching a source file.

/// Result of neutralizing the version guard in a source text.
///
/// `patched == false` means the guard was not found; `content` is then the
/// input, unchanged. This is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// Whether the guard function was found and rewritten
    pub patched: bool,
    /// The rewritten text, or the original text when nothing was patched
    pub content: String,
}

impl PatchResult {
    /// A result carrying the input back unchanged.
    pub fn unpatched(content: impl Into<String>) -> Self {
        Self {
            patched: false,
            content: content.into(),
        }
    }

    /// A result carrying rewritten content.
    pub fn patched(content: impl Into<String>) -> Self {
        Self {
            patched: true,
            content: content.into(),
        }
    }
}
