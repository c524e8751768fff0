//! Conversation state types

use crate::llm::LlmErrorKind;

/// Upper bound on tool round-trips within one user turn
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 25;

/// Why a turn ended in the error state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Model(LlmErrorKind),
    ToolRoundLimit { limit: u32 },
}

/// Conversation state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input
    #[default]
    Idle,

    /// A completion request is in flight
    AwaitingModel { tool_rounds: u32 },

    /// The model answered; waiting for the router's decision
    AwaitingRoute { tool_rounds: u32 },

    /// Tool calls from the latest assistant turn are running
    ToolDispatching { tool_rounds: u32 },

    /// The last turn failed; a new user message recovers
    Error { message: String, cause: FailureCause },

    /// Session over, no further events accepted
    Terminated,
}

impl ConvState {
    /// A turn is in progress and cannot take new user input
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ConvState::AwaitingModel { .. }
                | ConvState::AwaitingRoute { .. }
                | ConvState::ToolDispatching { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingModel { .. } => "awaiting_model",
            ConvState::AwaitingRoute { .. } => "awaiting_route",
            ConvState::ToolDispatching { .. } => "tool_dispatching",
            ConvState::Error { .. } => "error",
            ConvState::Terminated => "terminated",
        }
    }
}

/// Fixed per-session settings the transition function reads
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
    pub model_id: String,
    /// Route model turns through the tool router
    pub tools_enabled: bool,
    /// Keep prior turns; when false each input is sent alone
    pub keep_history: bool,
    pub max_tool_rounds: u32,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            model_id: model_id.into(),
            tools_enabled: false,
            keep_history: true,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    #[must_use]
    pub fn with_tools(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    #[must_use]
    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}
