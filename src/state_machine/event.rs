//! Events that can occur in a conversation

use crate::llm::LlmErrorKind;
use crate::router::Route;
use crate::tools::ToolResult;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage { text: String },
    Exit,

    // Model events
    ModelResponse { text: String },
    ModelError { message: String, kind: LlmErrorKind },

    // Router events
    Routed { route: Route },

    // Tool events
    ToolsComplete { results: Vec<ToolResult> },
}
