//! Captured request types for traced API calls.
//!
//! One [`LoggedRecord`] exists per network call written by the tracing
//! wrapper. Records are built once by the parser and never mutated.
//! Raw constructors are never exported - use smart constructors only.

// ===== Role =====

/// Author role of a request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Message authored by the user (the prompt we are after)
    User,
    /// Message authored by the model
    Assistant,
    /// Any other role string, kept verbatim
    Other(String),
}

impl Role {
    /// Parse a role string from the request body.
    pub fn parse(role: &str) -> Self {
        match role {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            other => Self::Other(other.to_string()),
        }
    }
}

// ===== MessageContent =====

/// Content of a request message.
///
/// Newer agent versions send a single plain string, older ones send a
/// sequence of typed blocks. Anything else is kept as `Unrecognized` so
/// extraction can degrade to an empty string instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain string content (newer encoding)
    Text(String),
    /// Typed block content (older encoding)
    Blocks(Vec<ContentBlock>),
    /// Content present but neither a string nor a block sequence
    Unrecognized,
}

// ===== ContentBlock =====

/// A typed content fragment.
///
/// Only `Text` blocks contribute to extracted text. Tool invocations,
/// images and the rest are carried as `Other` and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// `type: "text"` block
    Text {
        /// Block text
        text: String,
    },
    /// Any non-text block
    Other {
        /// The block's `type` tag (e.g. "tool_use", "image")
        kind: String,
    },
}

impl ContentBlock {
    /// Convenience constructor for a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Text of this block, if it is a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other { .. } => None,
        }
    }
}

// ===== Message =====

/// One entry of the request's `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: MessageContent,
}

impl Message {
    /// Create a message from role and content.
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self { role, content }
    }

    /// Shorthand for a user message with plain string content.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()))
    }

    /// Message author role
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Message content
    pub fn content(&self) -> &MessageContent {
        &self.content
    }
}

// ===== ToolDef =====

/// A tool definition advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDef {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

impl ToolDef {
    /// Create a tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Tool name, unique within a request
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description shown to the model
    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON schema of the tool input
    pub fn input_schema(&self) -> &serde_json::Value {
        &self.input_schema
    }
}

// ===== RequestBody =====

/// Body of a captured messages API request.
///
/// `model` is optional here because records are parsed permissively;
/// selection refuses model-less records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestBody {
    model: Option<String>,
    messages: Vec<Message>,
    system: Option<Vec<ContentBlock>>,
    tools: Option<Vec<ToolDef>>,
    declared_tools: usize,
}

impl RequestBody {
    /// Create a request body for the given model with no messages.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    /// Create a request body that carries no model name.
    pub fn without_model() -> Self {
        Self::default()
    }

    /// Attach messages (builder pattern).
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Attach system blocks (builder pattern).
    pub fn with_system(mut self, system: Vec<ContentBlock>) -> Self {
        self.system = Some(system);
        self
    }

    /// Attach tool definitions (builder pattern).
    pub fn with_tools(mut self, tools: Vec<ToolDef>) -> Self {
        self.declared_tools = tools.len();
        self.tools = Some(tools);
        self
    }

    /// Record the length of the logged `tools` array.
    ///
    /// Entries that could not be read as definitions are missing from
    /// [`tools`](Self::tools) but still count toward [`tool_count`](Self::tool_count).
    pub fn with_declared_tool_count(mut self, count: usize) -> Self {
        self.declared_tools = count;
        self
    }

    /// Model name, if the request named one
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Conversation messages in request order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// System prompt blocks, if the request carried a `system` array
    pub fn system(&self) -> Option<&[ContentBlock]> {
        self.system.as_deref()
    }

    /// Tool definitions, if the request carried a `tools` array
    pub fn tools(&self) -> Option<&[ToolDef]> {
        self.tools.as_deref()
    }

    /// Number of tools the request advertised (zero when absent).
    pub fn tool_count(&self) -> usize {
        self.declared_tools
    }
}

// ===== LoggedRecord =====

/// One captured request/response pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRecord {
    request: RequestBody,
    response: serde_json::Value,
    line_number: usize,
}

impl LoggedRecord {
    /// Create a record with an empty response.
    pub fn new(request: RequestBody) -> Self {
        Self {
            request,
            response: serde_json::Value::Null,
            line_number: 0,
        }
    }

    /// Attach the captured response (builder pattern).
    pub fn with_response(mut self, response: serde_json::Value) -> Self {
        self.response = response;
        self
    }

    /// Attach the 1-based log line this record came from (builder pattern).
    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    /// The captured request body
    pub fn request(&self) -> &RequestBody {
        &self.request
    }

    /// The captured response, `Null` if none was logged
    pub fn response(&self) -> &serde_json::Value {
        &self.response
    }

    /// 1-based line in the trace log, 0 when built in memory
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parse_recognizes_user_and_assistant() {
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("assistant"), Role::Assistant);
    }

    #[test]
    fn role_parse_keeps_unknown_roles_verbatim() {
        assert_eq!(Role::parse("tool"), Role::Other("tool".to_string()));
    }

    #[test]
    fn content_block_as_text_skips_other_kinds() {
        assert_eq!(ContentBlock::text("hi").as_text(), Some("hi"));
        let other = ContentBlock::Other {
            kind: "tool_use".to_string(),
        };
        assert_eq!(other.as_text(), None);
    }

    #[test]
    fn tool_count_is_zero_without_tools() {
        let body = RequestBody::new("claude-sonnet-4");
        assert_eq!(body.tool_count(), 0);
        assert!(body.tools().is_none());
    }

    #[test]
    fn tool_count_counts_every_definition() {
        let body = RequestBody::new("claude-sonnet-4").with_tools(vec![
            ToolDef::new("Read", "read a file", json!({})),
            ToolDef::new("mcp__x", "external", json!({})),
        ]);
        assert_eq!(body.tool_count(), 2);
    }

    #[test]
    fn tool_count_includes_unreadable_entries() {
        let body = RequestBody::new("claude-sonnet-4")
            .with_tools(vec![ToolDef::new("Read", "", json!({}))])
            .with_declared_tool_count(2);
        assert_eq!(body.tool_count(), 2);
        assert_eq!(body.tools().map(<[ToolDef]>::len), Some(1));
    }

    #[test]
    fn without_model_has_no_model() {
        assert_eq!(RequestBody::without_model().model(), None);
    }

    #[test]
    fn logged_record_defaults_to_null_response_and_line_zero() {
        let record = LoggedRecord::new(RequestBody::new("m"));
        assert_eq!(record.response(), &serde_json::Value::Null);
        assert_eq!(record.line_number(), 0);
    }

    #[test]
    fn logged_record_builders_attach_metadata() {
        let record = LoggedRecord::new(RequestBody::new("m"))
            .with_response(json!({"status": 200}))
            .with_line_number(7);
        assert_eq!(record.response()["status"], 200);
        assert_eq!(record.line_number(), 7);
    }
}
