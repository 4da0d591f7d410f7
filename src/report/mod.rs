//! Markdown report rendering.
//!
//! One report per agent version: model, system prompt, built-in tools with
//! their input schemas, and the user message that triggered the request.

use crate::extract::ExtractedPrompt;
use chrono::{DateTime, SecondsFormat, Utc};

const NONE_PLACEHOLDER: &str = "_(none)_";

/// Render the report for one version.
pub fn render_markdown(
    package: &str,
    version: &str,
    prompt: &ExtractedPrompt,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {package} v{version}\n\n"));
    out.push_str(&format!(
        "_Model: {} · Generated {}_\n\n",
        or_placeholder(&prompt.model),
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    out.push_str("## System Prompt\n\n");
    out.push_str(or_placeholder(&prompt.system_prompt));
    out.push_str("\n\n");

    out.push_str(&format!("## Tools ({})\n\n", prompt.tools.len()));
    if prompt.tools.is_empty() {
        out.push_str(NONE_PLACEHOLDER);
        out.push_str("\n\n");
    }
    for tool in &prompt.tools {
        out.push_str(&format!("### {}\n\n", tool.name()));
        if !tool.description().is_empty() {
            out.push_str(tool.description());
            out.push_str("\n\n");
        }
        let schema = serde_json::to_string_pretty(tool.input_schema())
            .unwrap_or_else(|_| tool.input_schema().to_string());
        out.push_str(&format!("```json\n{schema}\n```\n\n"));
    }

    out.push_str("## User Message\n\n");
    out.push_str(or_placeholder(&prompt.user_message));
    out.push('\n');

    out
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        NONE_PLACEHOLDER
    } else {
        text
    }
}
