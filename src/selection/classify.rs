//! Record classification predicates.
//!
//! All predicates are total: a missing field makes them return `false`.

use crate::model::LoggedRecord;

/// Default marker identifying the cheapest model tier.
pub const DEFAULT_LIGHTWEIGHT_MARKER: &str = "haiku";

/// Whether the record was sent to the lightweight model tier.
pub fn is_lightweight_model(record: &LoggedRecord) -> bool {
    is_lightweight_model_with(record, DEFAULT_LIGHTWEIGHT_MARKER)
}

/// [`is_lightweight_model`] with a custom tier marker.
///
/// Matching is case-insensitive. An empty marker matches nothing.
pub fn is_lightweight_model_with(record: &LoggedRecord, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    record
        .request()
        .model()
        .is_some_and(|model| model.to_lowercase().contains(&marker.to_lowercase()))
}

/// Whether the record advertised at least one tool.
pub fn has_tools(record: &LoggedRecord) -> bool {
    record.request().tool_count() > 0
}

/// Whether the record carried at least one system block.
pub fn has_system_prompt(record: &LoggedRecord) -> bool {
    record
        .request()
        .system()
        .is_some_and(|system| !system.is_empty())
}
