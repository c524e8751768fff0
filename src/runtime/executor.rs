//! Conversation runtime executor

use super::traits::TurnObserver;
use super::RuntimeError;

use crate::conversation::Conversation;
use crate::gateway::ModelGateway;
use crate::llm::LlmError;
use crate::router;
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event, FailureCause};
use crate::tools::{self, ToolRegistry};
use std::collections::VecDeque;

/// One session: conversation, state, and the collaborators effects need
pub struct AgentRuntime<'g> {
    context: ConvContext,
    state: ConvState,
    conversation: Conversation,
    gateway: &'g ModelGateway,
    tools: ToolRegistry,
    observers: Vec<Box<dyn TurnObserver>>,
}

impl<'g> AgentRuntime<'g> {
    pub fn new(context: ConvContext, gateway: &'g ModelGateway, tools: ToolRegistry) -> Self {
        tracing::debug!(
            session_id = %context.session_id,
            model = %context.model_id,
            tools = context.tools_enabled,
            history = context.keep_history,
            "Runtime created"
        );
        if context.tools_enabled && tools.is_empty() {
            tracing::warn!(session_id = %context.session_id, "Tool routing enabled with no tools registered");
        }
        Self {
            context,
            state: ConvState::Idle,
            conversation: Conversation::new(),
            gateway,
            tools,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl TurnObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    #[cfg(test)]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[cfg(test)]
    pub fn state(&self) -> &ConvState {
        &self.state
    }

    /// Run one user turn to completion
    pub async fn submit(&mut self, text: impl Into<String>) -> Result<(), RuntimeError> {
        tracing::info!(session_id = %self.context.session_id, "User turn");
        self.run(Event::UserMessage { text: text.into() }).await?;

        match &self.state {
            ConvState::Error { message, cause } => Err(match cause {
                FailureCause::Model(kind) => RuntimeError::Llm(LlmError::new(*kind, message.clone())),
                FailureCause::ToolRoundLimit { limit } => {
                    RuntimeError::ToolRoundLimit { limit: *limit }
                }
            }),
            _ => Ok(()),
        }
    }

    /// End the session, letting observers flush what they keep
    pub async fn shutdown(&mut self) -> Result<(), RuntimeError> {
        self.run(Event::Exit).await
    }

    /// Process an event and every follow-up event its effects produce
    async fn run(&mut self, event: Event) -> Result<(), RuntimeError> {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let result = transition(&self.state, &self.context, event)?;
            tracing::debug!(
                session_id = %self.context.session_id,
                from = self.state.name(),
                to = result.new_state.name(),
                "State transition"
            );
            self.state = result.new_state;

            for effect in result.effects {
                if let Some(next) = self.execute_effect(effect).await? {
                    pending.push_back(next);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<Option<Event>, RuntimeError> {
        match effect {
            Effect::ClearHistory => {
                self.conversation.clear();
                Ok(None)
            }

            Effect::AppendTurn(turn) => {
                tracing::debug!(role = turn.role.label(), chars = turn.text.len(), "Turn appended");
                for observer in &mut self.observers {
                    observer.on_turn(&turn);
                }
                self.conversation.append(turn);
                Ok(None)
            }

            Effect::RequestModel => Ok(Some(self.request_model().await)),

            Effect::RouteLatest => {
                let route = router::route_latest(self.conversation.last());
                tracing::debug!(?route, "Routed latest turn");
                Ok(Some(Event::Routed { route }))
            }

            Effect::DispatchTools => {
                let text = self
                    .conversation
                    .last_assistant()
                    .map(|turn| turn.text.clone())
                    .unwrap_or_default();
                let results = tools::dispatch(&self.tools, &text).await;
                Ok(Some(Event::ToolsComplete { results }))
            }

            Effect::TurnComplete => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    turns = self.conversation.len(),
                    conversation = ?self.conversation.turns(),
                    "Turn complete"
                );
                Ok(None)
            }

            Effect::TurnFailed { message } => {
                tracing::error!(session_id = %self.context.session_id, error = %message, "Turn failed");
                Ok(None)
            }

            Effect::Shutdown => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    turns = self.conversation.len(),
                    "Session ended"
                );
                for observer in &mut self.observers {
                    observer.on_session_end(&self.conversation)?;
                }
                Ok(None)
            }
        }
    }

    async fn request_model(&mut self) -> Event {
        let streaming = self.gateway.is_streaming();
        tracing::debug!(
            model = self.gateway.model_id(),
            streaming,
            turns = self.conversation.len(),
            "Requesting completion"
        );
        if streaming {
            for observer in &mut self.observers {
                observer.on_stream_start();
            }
        }

        let observers = &mut self.observers;
        let mut forward = |fragment: &str| {
            for observer in observers.iter_mut() {
                observer.on_fragment(fragment);
            }
        };
        let result = self.gateway.respond(&self.conversation, &mut forward).await;

        if streaming {
            for observer in &mut self.observers {
                observer.on_stream_end();
            }
        }

        match result {
            Ok(turn) => Event::ModelResponse { text: turn.text },
            Err(e) => Event::ModelError {
                message: e.message,
                kind: e.kind,
            },
        }
    }
}
