//! Representative request selection.
//!
//! A single traced run issues several API calls: quota checks, title
//! generation on the lightweight tier, and the real conversation turn.
//! [`Selector::select_best`] picks the call that exercises the richest
//! surface, falling back tier by tier:
//!
//! 1. drop lightweight-model and model-less records
//! 2. tools + system prompt, most tools wins
//! 3. tools only, most tools wins
//! 4. the first remaining record
//!
//! Ties on tool count go to the earliest record.

pub mod classify;

pub use classify::{
    has_system_prompt, has_tools, is_lightweight_model, is_lightweight_model_with,
    DEFAULT_LIGHTWEIGHT_MARKER,
};

use crate::model::{LoggedRecord, SelectionError};
use tracing::debug;

/// Tiered request selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    lightweight_marker: String,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHTWEIGHT_MARKER)
    }
}

impl Selector {
    /// Create a selector excluding models whose name contains `lightweight_marker`.
    pub fn new(lightweight_marker: impl Into<String>) -> Self {
        Self {
            lightweight_marker: lightweight_marker.into(),
        }
    }

    /// Pick the most representative record.
    ///
    /// Returns a reference into `records`; repeated calls on the same slice
    /// return the same element.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoSuitableRequest`] when every record is
    /// excluded by tier 0, or `records` is empty.
    pub fn select_best<'a>(
        &self,
        records: &'a [LoggedRecord],
    ) -> Result<&'a LoggedRecord, SelectionError> {
        let eligible: Vec<&LoggedRecord> = records
            .iter()
            .filter(|record| record.request().model().is_some())
            .filter(|record| !is_lightweight_model_with(record, &self.lightweight_marker))
            .collect();

        let with_tools: Vec<&LoggedRecord> =
            eligible.iter().copied().filter(|r| has_tools(r)).collect();

        let with_system: Vec<&LoggedRecord> = with_tools
            .iter()
            .copied()
            .filter(|r| has_system_prompt(r))
            .collect();

        let (tier, chosen) = if let Some(best) = most_tools(&with_system) {
            ("tools+system", Some(best))
        } else if let Some(best) = most_tools(&with_tools) {
            ("tools", Some(best))
        } else {
            ("any", eligible.first().copied())
        };

        let chosen = chosen.ok_or(SelectionError::NoSuitableRequest {
            candidates: records.len(),
        })?;

        debug!(
            tier,
            candidates = records.len(),
            eligible = eligible.len(),
            line = chosen.line_number(),
            model = chosen.request().model().unwrap_or_default(),
            tools = chosen.request().tool_count(),
            "Selected request"
        );
        Ok(chosen)
    }
}

/// Pick the best record using the default lightweight marker.
///
/// # Errors
///
/// See [`Selector::select_best`].
pub fn select_best(records: &[LoggedRecord]) -> Result<&LoggedRecord, SelectionError> {
    Selector::default().select_best(records)
}

/// Record with the highest tool count; the earliest one on ties.
fn most_tools<'a>(records: &[&'a LoggedRecord]) -> Option<&'a LoggedRecord> {
    records.iter().copied().reduce(|best, candidate| {
        if candidate.request().tool_count() > best.request().tool_count() {
            candidate
        } else {
            best
        }
    })
}
