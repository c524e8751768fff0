//! Best-effort extraction of inline tool calls from model text

use super::{Operation, ToolOutput, ToolRegistry, ToolResult};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(add|subtract|multiply)\(([^()]*)\)").expect("call pattern is valid")
});

static ARG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[ab]\s*[=:]\s*)?([+-]?\d+)\s*$").expect("argument pattern is valid")
});

/// A call spotted in assistant text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub op: Operation,
    /// Source text of the call, e.g. `add(40, 12)`
    pub raw: String,
    /// Parsed operands; `None` when the arguments are not two integers
    pub args: Option<(i64, i64)>,
}

/// Find every `name(...)` call in order of appearance.
///
/// Arguments are accepted as `40, 12`, `a=40, b=12` or `a: 40, b: 12`.
/// Anything else is kept with `args: None` so the model hears about it.
pub fn extract_calls(text: &str) -> Vec<ToolCall> {
    CALL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let op = Operation::from_name(caps.get(1)?.as_str())?;
            let raw = caps.get(0)?.as_str().to_string();
            let args = parse_args(caps.get(2).map_or("", |m| m.as_str()));
            Some(ToolCall { op, raw, args })
        })
        .collect()
}

fn parse_args(args: &str) -> Option<(i64, i64)> {
    let mut parsed = args.split(',').map(|arg| {
        ARG_RE
            .captures(arg)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    });
    let a = parsed.next()??;
    let b = parsed.next()??;
    if parsed.next().is_some() {
        return None;
    }
    Some((a, b))
}

/// Run every call found in `text` through the registry, in order
pub async fn dispatch(registry: &ToolRegistry, text: &str) -> Vec<ToolResult> {
    let mut results = Vec::new();

    for call in extract_calls(text) {
        let output = match call.args {
            Some((a, b)) => registry
                .execute(call.op.name(), json!({ "a": a, "b": b }))
                .await
                .unwrap_or_else(|| ToolOutput::error("tool is not available")),
            None => ToolOutput::error("expected two integer arguments"),
        };

        tracing::debug!(
            call = %call.raw,
            success = output.success,
            output = %output.output,
            "Tool dispatched"
        );
        results.push(ToolResult {
            call: call.raw,
            output,
        });
    }

    results
}
