//! Version guard neutralization.
//!
//! Released agent bundles refuse to start when a remote minimum-version
//! check fails. The check lives in one function whose body contains a
//! recognizable message. We find that function by plain text scanning and
//! replace its body with an inert comment so execution proceeds.
//!
//! # Known limitation
//!
//! The scan is a heuristic, not a parse. Braces inside string literals,
//! template literals, regexes or comments are counted like any other brace,
//! so a guard body containing e.g. `"}"` is cut short. Implement
//! [`GuardNeutralizer`] with a tokenizer if that ever matters in practice.

use crate::model::PatchResult;

/// Default marker: text from the minimum-version error message.
pub const DEFAULT_GUARD_MARKER: &str = "needs an update";

/// Keyword that opens a function definition.
const FUNCTION_KEYWORD: &str = "function";

/// Body written into a neutralized function.
pub const NEUTRALIZED_BODY: &str = "/* version guard disabled by promptmine */";

/// Strategy for disabling the guard function in a source text.
pub trait GuardNeutralizer {
    /// Rewrite the function that contains `marker`, or return the text unchanged.
    fn neutralize(&self, text: &str, marker: &str) -> PatchResult;
}

/// Byte-level brace matching neutralizer. See the module docs for its limits.
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceScanNeutralizer;

impl GuardNeutralizer for BraceScanNeutralizer {
    fn neutralize(&self, text: &str, marker: &str) -> PatchResult {
        locate_and_neutralize(text, marker)
    }
}

/// Byte offsets of the guard function inside the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GuardSpan {
    /// Start of the `function` keyword
    start: usize,
    /// Position of the body's opening `{`
    body_open: usize,
    /// Position of the matching closing `}`
    body_close: usize,
}

/// Find the function enclosing `marker` and give it an empty body.
///
/// Every not-found condition (marker absent, no preceding `function`,
/// no opening brace, unbalanced braces) yields `patched == false` with the
/// input returned verbatim. Text outside the rewritten function is
/// preserved byte for byte.
pub fn locate_and_neutralize(text: &str, marker: &str) -> PatchResult {
    match locate_guard(text, marker) {
        Some(span) => PatchResult::patched(splice(text, span)),
        None => PatchResult::unpatched(text),
    }
}

fn locate_guard(text: &str, marker: &str) -> Option<GuardSpan> {
    if marker.is_empty() {
        return None;
    }

    let marker_pos = text.find(marker)?;
    let start = text[..marker_pos].rfind(FUNCTION_KEYWORD)?;
    let body_open = start + text[start..].find('{')?;
    let body_close = matching_brace(text.as_bytes(), body_open)?;

    Some(GuardSpan {
        start,
        body_open,
        body_close,
    })
}

/// Single pass depth counter starting at the `{` at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn splice(text: &str, span: GuardSpan) -> String {
    let header = &text[span.start..=span.body_open];
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..span.start]);
    out.push_str(header);
    out.push_str(NEUTRALIZED_BODY);
    out.push('}');
    out.push_str(&text[span.body_close + 1..]);
    out
}
