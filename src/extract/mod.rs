//! Content extraction from a selected request.
//!
//! Normalizes both content encodings (plain string and typed block
//! sequence) into plain text, and filters tool definitions down to the
//! agent's built-in tools in a stable order.
//!
//! Extraction never fails: unknown shapes degrade to an empty string.

use crate::model::{LoggedRecord, Message, MessageContent, RequestBody, Role, ToolDef};
use std::cmp::Ordering;
use tracing::warn;

/// Name prefix of dynamically registered (external server) tools.
pub const DEFAULT_RESERVED_TOOL_PREFIX: &str = "mcp__";

/// Everything we document about one agent version.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPrompt {
    /// Model the request was sent to
    pub model: String,
    /// Text of the first user message
    pub user_message: String,
    /// System prompt blocks joined with newlines
    pub system_prompt: String,
    /// Built-in tools sorted by name
    pub tools: Vec<ToolDef>,
}

impl ExtractedPrompt {
    /// Extract all documented fields from a selected record.
    ///
    /// Empty user message or system prompt are logged as warnings; they are
    /// valid results, not errors.
    pub fn from_record(record: &LoggedRecord, reserved_prefix: &str) -> Self {
        let request = record.request();
        let extracted = Self {
            model: request.model().unwrap_or_default().to_string(),
            user_message: extract_user_message(request.messages()),
            system_prompt: extract_system_prompt(request),
            tools: filter_and_sort_tools_with(request.tools(), reserved_prefix),
        };

        if extracted.user_message.is_empty() {
            warn!(line = record.line_number(), "Selected request has no user text");
        }
        if extracted.system_prompt.is_empty() {
            warn!(line = record.line_number(), "Selected request has no system prompt");
        }

        extracted
    }
}

/// Text of the first `user` message.
///
/// Plain string content is returned verbatim. Block content yields the
/// text blocks joined with `"\n"`. Returns `""` if there is no user message
/// or its content has no text.
pub fn extract_user_message(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|message| *message.role() == Role::User)
        .map(|message| content_text(message.content()))
        .unwrap_or_default()
}

/// System prompt blocks joined with `"\n"`, or `""` if absent.
pub fn extract_system_prompt(body: &RequestBody) -> String {
    body.system()
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| block.as_text())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Built-in tools sorted by name, using the default reserved prefix.
pub fn filter_and_sort_tools(tools: Option<&[ToolDef]>) -> Vec<ToolDef> {
    filter_and_sort_tools_with(tools, DEFAULT_RESERVED_TOOL_PREFIX)
}

/// Drop tools whose name starts with `reserved_prefix`, sort the rest by name.
///
/// An empty prefix drops nothing.
pub fn filter_and_sort_tools_with(
    tools: Option<&[ToolDef]>,
    reserved_prefix: &str,
) -> Vec<ToolDef> {
    let Some(tools) = tools else {
        return Vec::new();
    };

    let mut kept: Vec<ToolDef> = tools
        .iter()
        .filter(|tool| reserved_prefix.is_empty() || !tool.name().starts_with(reserved_prefix))
        .cloned()
        .collect();
    kept.sort_by(|a, b| locale_cmp(a.name(), b.name()));
    kept
}

fn content_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("\n"),
        MessageContent::Unrecognized => String::new(),
    }
}

/// Dictionary-style ordering: case-insensitive, lowercase first on ties.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
