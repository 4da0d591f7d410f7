//! Property-based tests for the patcher and selector.
//!
//! Tests validate:
//! 1. Text without the marker comes back unchanged and unpatched
//! 2. A patched guard keeps its header, the surrounding text and brace balance
//! 3. Selection is deterministic and independent of the lightweight records mixed in

use promptmine::model::{ContentBlock, LoggedRecord, Message, RequestBody, ToolDef};
use promptmine::patcher::{locate_and_neutralize, DEFAULT_GUARD_MARKER, NEUTRALIZED_BODY};
use promptmine::selection::select_best;
use proptest::prelude::*;

fn brace_balance(text: &str) -> i64 {
    text.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Brace-balanced snippets that cannot contain the marker or a `function` keyword.
fn balanced_body() -> impl Strategy<Value = String> {
    let leaf = "[a-e0-9 ;=().<>+]{0,12}";
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|parts| {
            parts
                .into_iter()
                .map(|p| format!("if(x){{{p}}}"))
                .collect::<String>()
        })
    })
}

// ===== Property 1: Marker absent =====

proptest! {
    #[test]
    fn text_without_marker_is_unchanged(text in "[ -~\n]{0,200}") {
        prop_assume!(!text.contains(DEFAULT_GUARD_MARKER));

        let result = locate_and_neutralize(&text, DEFAULT_GUARD_MARKER);

        prop_assert!(!result.patched);
        prop_assert_eq!(result.content, text);
    }
}

// ===== Property 2: Guard rewritten in place =====

proptest! {
    #[test]
    fn patched_guard_keeps_header_context_and_balance(
        prefix in "[a-z;=() ]{0,40}",
        name in "[a-z][a-z0-9]{0,8}",
        before in balanced_body(),
        after in balanced_body(),
        suffix in "[a-z;=() ]{0,40}",
    ) {
        let header = format!("function {name}(v){{");
        let guard = format!(
            "{header}{before}if(v){{throw Error(\"{DEFAULT_GUARD_MARKER}\")}}{after}}}"
        );
        prop_assume!(!prefix.contains(DEFAULT_GUARD_MARKER));
        let text = format!("{prefix}{guard}{suffix}");

        let result = locate_and_neutralize(&text, DEFAULT_GUARD_MARKER);

        prop_assert!(result.patched);
        prop_assert_eq!(
            &result.content,
            &format!("{prefix}{header}{NEUTRALIZED_BODY}}}{suffix}")
        );
        prop_assert_eq!(brace_balance(&result.content), brace_balance(&text));
        prop_assert!(!result.content.contains(DEFAULT_GUARD_MARKER));
    }
}

// ===== Property 3: Selection determinism =====

fn record(model: &str, tools: usize, system: bool) -> LoggedRecord {
    let mut body = RequestBody::new(model)
        .with_messages(vec![Message::user_text("hi")])
        .with_tools(
            (0..tools)
                .map(|i| ToolDef::new(format!("Tool{i}"), "", serde_json::json!({})))
                .collect(),
        );
    if system {
        body = body.with_system(vec![ContentBlock::text("system")]);
    }
    LoggedRecord::new(body)
}

fn record_strategy() -> impl Strategy<Value = LoggedRecord> {
    (
        prop::sample::select(vec!["claude-sonnet-4", "claude-3-5-haiku", "claude-opus-4"]),
        0usize..5,
        any::<bool>(),
    )
        .prop_map(|(model, tools, system)| record(model, tools, system))
}

proptest! {
    #[test]
    fn selection_is_deterministic(records in prop::collection::vec(record_strategy(), 0..12)) {
        let first = select_best(&records).ok().map(|r| r as *const LoggedRecord);
        let second = select_best(&records).ok().map(|r| r as *const LoggedRecord);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn selection_never_picks_lightweight_model(
        records in prop::collection::vec(record_strategy(), 0..12)
    ) {
        if let Ok(best) = select_best(&records) {
            let model = best.request().model().unwrap_or_default();
            prop_assert!(!model.contains("haiku"));
        }
    }

    #[test]
    fn lightweight_records_do_not_change_selection(
        records in prop::collection::vec(record_strategy(), 1..10),
        tools in 0usize..8,
    ) {
        let position = |all: &[LoggedRecord]| {
            select_best(all)
                .ok()
                .and_then(|best| all.iter().position(|r| std::ptr::eq(r, best)))
        };
        let baseline = position(&records);

        let mut with_noise = records.clone();
        with_noise.push(record("claude-3-5-haiku", tools, true));
        let noisy = position(&with_noise);

        prop_assert_eq!(baseline, noisy);
    }
}
