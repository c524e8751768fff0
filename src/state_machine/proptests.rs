//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::llm::LlmErrorKind;
use crate::router::Route;
use crate::tools::{ToolOutput, ToolResult};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_context() -> impl Strategy<Value = ConvContext> {
    (any::<bool>(), any::<bool>(), 1u32..6).prop_map(|(tools, history, rounds)| {
        ConvContext::new("test-session", "test-model")
            .with_tools(tools)
            .with_history(history)
            .with_max_tool_rounds(rounds)
    })
}

fn arb_error_kind() -> impl Strategy<Value = LlmErrorKind> {
    prop_oneof![
        Just(LlmErrorKind::Network),
        Just(LlmErrorKind::RateLimit),
        Just(LlmErrorKind::ServerError),
        Just(LlmErrorKind::Auth),
        Just(LlmErrorKind::InvalidRequest),
        Just(LlmErrorKind::Unknown),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Idle),
        (0u32..8).prop_map(|tool_rounds| ConvState::AwaitingModel { tool_rounds }),
        (0u32..8).prop_map(|tool_rounds| ConvState::AwaitingRoute { tool_rounds }),
        (1u32..8).prop_map(|tool_rounds| ConvState::ToolDispatching { tool_rounds }),
        ("[a-z ]{1,20}", arb_error_kind()).prop_map(|(message, kind)| ConvState::Error {
            message,
            cause: FailureCause::Model(kind),
        }),
        Just(ConvState::Terminated),
    ]
}

fn arb_tool_result() -> impl Strategy<Value = ToolResult> {
    ("[a-z]{3,8}\\([0-9]{1,3}, [0-9]{1,3}\\)", any::<bool>(), "[0-9]{1,4}").prop_map(
        |(call, success, output)| ToolResult {
            call,
            output: if success {
                ToolOutput::success(output)
            } else {
                ToolOutput::error(output)
            },
        },
    )
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}".prop_map(|text| Event::UserMessage { text }),
        Just(Event::Exit),
        "[a-zA-Z0-9 (),]{0,30}".prop_map(|text| Event::ModelResponse { text }),
        ("[a-z ]{1,20}", arb_error_kind())
            .prop_map(|(message, kind)| Event::ModelError { message, kind }),
        prop_oneof![Just(Route::Continue), Just(Route::End)]
            .prop_map(|route| Event::Routed { route }),
        proptest::collection::vec(arb_tool_result(), 0..4)
            .prop_map(|results| Event::ToolsComplete { results }),
    ]
}

fn tool_rounds(state: &ConvState) -> Option<u32> {
    match state {
        ConvState::AwaitingModel { tool_rounds }
        | ConvState::AwaitingRoute { tool_rounds }
        | ConvState::ToolDispatching { tool_rounds } => Some(*tool_rounds),
        _ => None,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Transition never panics, whatever the input
    #[test]
    fn prop_transition_total(state in arb_state(), ctx in arb_context(), event in arb_event()) {
        let _ = transition(&state, &ctx, event);
    }

    /// Busy states reject user input
    #[test]
    fn prop_busy_rejects_user_message(state in arb_state(), ctx in arb_context(), text in "[a-z ]{0,20}") {
        let result = transition(&state, &ctx, Event::UserMessage { text });
        if state.is_busy() {
            prop_assert!(matches!(result, Err(TransitionError::AgentBusy)));
        }
    }

    /// Nothing gets past Terminated
    #[test]
    fn prop_terminated_is_final(ctx in arb_context(), event in arb_event()) {
        let result = transition(&ConvState::Terminated, &ctx, event);
        prop_assert!(matches!(result, Err(TransitionError::SessionEnded)));
    }

    /// Tool round counters never exceed the configured limit
    #[test]
    fn prop_rounds_bounded(state in arb_state(), ctx in arb_context(), event in arb_event()) {
        if tool_rounds(&state).is_some_and(|r| r > ctx.max_tool_rounds) {
            return Ok(());
        }
        if let Ok(result) = transition(&state, &ctx, event) {
            if let Some(rounds) = tool_rounds(&result.new_state) {
                prop_assert!(rounds <= ctx.max_tool_rounds);
            }
        }
    }

    /// Every assistant turn comes from a model response, and a model
    /// response appends exactly one assistant turn
    #[test]
    fn prop_one_assistant_turn_per_response(state in arb_state(), ctx in arb_context(), event in arb_event()) {
        let is_response = matches!(event, Event::ModelResponse { .. });
        if let Ok(result) = transition(&state, &ctx, event) {
            let appended = result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::AppendTurn(t) if t.role == crate::conversation::Role::Assistant))
                .count();
            prop_assert_eq!(appended, usize::from(is_response));
        }
    }

    /// Without tools enabled the router is never consulted
    #[test]
    fn prop_no_routing_without_tools(state in arb_state(), ctx in arb_context(), event in arb_event()) {
        let ctx = ctx.with_tools(false);
        if let Ok(result) = transition(&state, &ctx, event) {
            prop_assert!(!result.effects.contains(&Effect::RouteLatest));
        }
    }
}
