//! Pure state transition function
//!
//! Idle -> AwaitingModel -> AwaitingRoute -> (ToolDispatching -> AwaitingModel)* -> Idle

use super::{ConvContext, ConvState, Effect, Event, FailureCause};
use crate::router::Route;
use crate::tools::render_results;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Agent is busy, cannot accept input until the current turn finishes")]
    AgentBusy,
    #[error("Session has ended")]
    SessionEnded,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User input
        // ============================================================

        // Idle/Error + UserMessage -> AwaitingModel (Error recovers)
        (ConvState::Idle | ConvState::Error { .. }, Event::UserMessage { text }) => {
            let mut result = TransitionResult::new(ConvState::AwaitingModel { tool_rounds: 0 });
            if !context.keep_history {
                result = result.with_effect(Effect::ClearHistory);
            }
            Ok(result
                .with_effect(Effect::append_user(text))
                .with_effect(Effect::RequestModel))
        }

        (ConvState::Idle | ConvState::Error { .. }, Event::Exit) => {
            Ok(TransitionResult::new(ConvState::Terminated).with_effect(Effect::Shutdown))
        }

        (state, Event::UserMessage { .. } | Event::Exit) if state.is_busy() => {
            Err(TransitionError::AgentBusy)
        }

        (ConvState::Terminated, _) => Err(TransitionError::SessionEnded),

        // ============================================================
        // Model responses
        // ============================================================

        // Tools disabled: the single node is the whole pipeline
        (ConvState::AwaitingModel { .. }, Event::ModelResponse { text })
            if !context.tools_enabled =>
        {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::append_assistant(text))
                .with_effect(Effect::TurnComplete))
        }

        (ConvState::AwaitingModel { tool_rounds }, Event::ModelResponse { text }) => {
            Ok(TransitionResult::new(ConvState::AwaitingRoute {
                tool_rounds: *tool_rounds,
            })
            .with_effect(Effect::append_assistant(text))
            .with_effect(Effect::RouteLatest))
        }

        // No retry: the error ends the turn
        (ConvState::AwaitingModel { .. }, Event::ModelError { message, kind }) => {
            Ok(TransitionResult::new(ConvState::Error {
                message: message.clone(),
                cause: FailureCause::Model(kind),
            })
            .with_effect(Effect::TurnFailed { message }))
        }

        // ============================================================
        // Routing
        // ============================================================

        (ConvState::AwaitingRoute { .. }, Event::Routed { route: Route::End }) => {
            Ok(TransitionResult::new(ConvState::Idle).with_effect(Effect::TurnComplete))
        }

        (ConvState::AwaitingRoute { tool_rounds }, Event::Routed { route: Route::Continue })
            if *tool_rounds < context.max_tool_rounds =>
        {
            Ok(TransitionResult::new(ConvState::ToolDispatching {
                tool_rounds: tool_rounds + 1,
            })
            .with_effect(Effect::DispatchTools))
        }

        (ConvState::AwaitingRoute { .. }, Event::Routed { route: Route::Continue }) => {
            let limit = context.max_tool_rounds;
            let message = format!("Tool round limit of {limit} reached without a final answer");
            Ok(TransitionResult::new(ConvState::Error {
                message: message.clone(),
                cause: FailureCause::ToolRoundLimit { limit },
            })
            .with_effect(Effect::TurnFailed { message }))
        }

        // ============================================================
        // Tool dispatch
        // ============================================================

        (ConvState::ToolDispatching { tool_rounds }, Event::ToolsComplete { results }) => {
            Ok(TransitionResult::new(ConvState::AwaitingModel {
                tool_rounds: *tool_rounds,
            })
            .with_effect(Effect::append_tool(render_results(&results)))
            .with_effect(Effect::RequestModel))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
