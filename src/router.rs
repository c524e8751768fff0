//! Turn router: decides whether the latest turn asks for a tool.
//!
//! This is a best-effort lexical heuristic, not a parsed tool-call protocol.
//! A turn routes to tools when its text contains a tool name immediately
//! followed by `(`. Prose that merely mentions `add(` routes to tools, and a
//! tool intent phrased without parentheses does not. Both are expected.

use crate::conversation::Turn;

/// Literal substrings that signal tool intent
pub const TOOL_PATTERNS: [&str; 3] = ["add(", "subtract(", "multiply("];

/// Where control goes after a model turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Dispatch tools, then ask the model again
    Continue,
    /// The turn is finished
    End,
}

pub fn route(text: &str) -> Route {
    if TOOL_PATTERNS.iter().any(|p| text.contains(p)) {
        Route::Continue
    } else {
        Route::End
    }
}

/// Route on the latest turn; an empty conversation ends.
pub fn route_latest(latest: Option<&Turn>) -> Route {
    latest.map_or(Route::End, |turn| route(&turn.text))
}
