//! Runtime for executing conversations
//!
//! Drives the pure state machine, performing each effect it asks for.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::AgentRuntime;
pub use traits::TurnObserver;

use crate::llm::LlmError;
use crate::state_machine::TransitionError;
use thiserror::Error;

/// Errors surfaced to the caller of a session
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Tool round limit of {limit} reached without a final answer")]
    ToolRoundLimit { limit: u32 },
    #[error("Failed to write session output: {0}")]
    Io(#[from] std::io::Error),
}
