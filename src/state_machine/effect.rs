//! Effects produced by state transitions

use crate::conversation::Turn;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Forget earlier turns before the next one is appended
    ClearHistory,

    /// Append a turn to the conversation and show it to observers
    AppendTurn(Turn),

    /// Ask the model gateway for the next assistant turn
    RequestModel,

    /// Run the router over the latest turn
    RouteLatest,

    /// Run the tool calls found in the latest assistant turn
    DispatchTools,

    /// The user turn finished normally
    TurnComplete,

    /// The user turn failed
    TurnFailed { message: String },

    /// The session is over; flush anything persisted at shutdown
    Shutdown,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::user(text))
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::assistant(text))
    }

    pub fn append_tool(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::tool(text))
    }
}
