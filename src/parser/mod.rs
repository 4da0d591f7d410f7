//! JSONL parser for captured trace logs.
//!
//! This module provides pure parsing functions for converting trace log lines
//! into validated [`LoggedRecord`]s. Each line holds one `{request, response}`
//! pair. The request is either the bare API body or the tracer's HTTP
//! envelope with the body nested under `body`.

use crate::model::{
    ContentBlock, LoggedRecord, MalformedEntry, Message, MessageContent, ParseError, RequestBody,
    Role, ToolDef,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// Content block type tag for text
const BLOCK_TYPE_TEXT: &str = "text";

/// Raw JSON structure for one trace line.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    request: Option<Value>,
    #[serde(default)]
    response: Value,
}

#[derive(Debug, Deserialize)]
struct RawRequestBody {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    messages: Vec<RawMessage>,
    #[serde(default)]
    system: Option<RawSequence<RawBlock>>,
    #[serde(default)]
    tools: Option<RawSequence<Value>>,
}

/// A field that should be an array but may arrive in another shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSequence<T> {
    Items(Vec<T>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<RawMessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessageContent {
    Text(String),
    Blocks(Vec<RawBlock>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawToolDef {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_schema: Option<Value>,
}

/// Result of parsing a trace line with graceful error handling.
#[derive(Debug, Clone)]
pub enum ParseResult {
    /// Successfully parsed a record.
    Valid(Box<LoggedRecord>),
    /// Encountered a line that could not be parsed.
    Malformed(MalformedEntry),
}

/// All records of a trace log, plus the lines that were skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Records in log order
    pub records: Vec<LoggedRecord>,
    /// Lines that failed to parse, in log order
    pub malformed: Vec<MalformedEntry>,
}

/// Parse a whole trace log.
///
/// Blank lines are ignored. Malformed lines are logged at warn level and
/// collected into [`ParsedLog::malformed`]; they never abort parsing.
pub fn parse_log(text: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record_graceful(line, index + 1) {
            ParseResult::Valid(record) => parsed.records.push(*record),
            ParseResult::Malformed(entry) => {
                warn!(
                    line = entry.line_number(),
                    error = entry.error_message(),
                    "Skipping malformed trace line"
                );
                parsed.malformed.push(entry);
            }
        }
    }

    debug!(
        records = parsed.records.len(),
        malformed = parsed.malformed.len(),
        "Parsed trace log"
    );
    parsed
}

/// Parse a single trace line gracefully.
///
/// Unlike [`parse_record`], this never returns an error.
///
/// # Arguments
///
/// * `raw` - The raw JSONL line to parse
/// * `line_number` - The line number (1-indexed) for error reporting
pub fn parse_record_graceful(raw: &str, line_number: usize) -> ParseResult {
    match parse_record(raw, line_number) {
        Ok(record) => ParseResult::Valid(Box::new(record)),
        Err(parse_error) => ParseResult::Malformed(MalformedEntry::new(
            line_number,
            raw,
            parse_error.to_string(),
        )),
    }
}

/// Parse a single trace line into a LoggedRecord.
///
/// # Errors
///
/// Returns `ParseError` if:
/// - the line is not JSON, or the request body has an impossible shape
/// - the line has no `request`, or the request carries no API body
pub fn parse_record(raw: &str, line_number: usize) -> Result<LoggedRecord, ParseError> {
    let invalid = |e: serde_json::Error| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    };

    let raw_record: RawRecord = serde_json::from_str(raw).map_err(invalid)?;

    let request = raw_record.request.ok_or(ParseError::MissingField {
        line: line_number,
        field: "request",
    })?;

    let body = request_body_value(request).ok_or(ParseError::MissingField {
        line: line_number,
        field: "request.body",
    })?;

    let raw_body: RawRequestBody = serde_json::from_value(body).map_err(invalid)?;

    Ok(LoggedRecord::new(convert_body(raw_body))
        .with_response(raw_record.response)
        .with_line_number(line_number))
}

/// Unwrap the API body from a logged request.
///
/// The tracer logs `{method, url, headers, body}`; `body` may itself be a
/// JSON-encoded string. A request that already looks like an API body is
/// used as-is.
fn request_body_value(request: Value) -> Option<Value> {
    let Value::Object(mut map) = request else {
        return None;
    };

    match map.remove("body") {
        Some(Value::Object(body)) => Some(Value::Object(body)),
        Some(Value::String(encoded)) => match serde_json::from_str(&encoded) {
            Ok(Value::Object(body)) => Some(Value::Object(body)),
            _ => None,
        },
        Some(_) => None,
        None if map.contains_key("model") || map.contains_key("messages") => {
            Some(Value::Object(map))
        }
        None => None,
    }
}

fn convert_body(raw: RawRequestBody) -> RequestBody {
    let mut body = match raw.model {
        Some(model) => RequestBody::new(model),
        None => RequestBody::without_model(),
    };

    body = body.with_messages(raw.messages.into_iter().map(convert_message).collect());

    if let Some(RawSequence::Items(blocks)) = raw.system {
        body = body.with_system(blocks.into_iter().map(convert_block).collect());
    }

    if let Some(RawSequence::Items(tools)) = raw.tools {
        let declared = tools.len();
        body = body
            .with_tools(tools.into_iter().filter_map(convert_tool).collect())
            .with_declared_tool_count(declared);
    }

    body
}

fn convert_message(raw: RawMessage) -> Message {
    let content = match raw.content {
        Some(RawMessageContent::Text(text)) => MessageContent::Text(text),
        Some(RawMessageContent::Blocks(blocks)) => {
            MessageContent::Blocks(blocks.into_iter().map(convert_block).collect())
        }
        Some(RawMessageContent::Other(_)) | None => MessageContent::Unrecognized,
    };
    Message::new(Role::parse(raw.role.as_deref().unwrap_or_default()), content)
}

fn convert_block(raw: RawBlock) -> ContentBlock {
    if raw.kind == BLOCK_TYPE_TEXT {
        ContentBlock::Text {
            text: raw.text.unwrap_or_default(),
        }
    } else {
        ContentBlock::Other { kind: raw.kind }
    }
}

fn convert_tool(raw: Value) -> Option<ToolDef> {
    match serde_json::from_value::<RawToolDef>(raw) {
        Ok(tool) => Some(ToolDef::new(
            tool.name,
            tool.description.unwrap_or_default(),
            tool.input_schema.unwrap_or_default(),
        )),
        Err(e) => {
            warn!(error = %e, "Leaving unreadable tool definition out of the report");
            None
        }
    }
}
