//! Model gateway: turns a conversation into one assistant turn
//!
//! Built once per session and passed by reference to the runtime. Holds the
//! service, the fixed system instruction and the fixed sampling parameters.

use crate::conversation::{Conversation, Turn};
use crate::llm::{fold_stream, LlmError, LlmMessage, LlmRequest, LlmService, SamplingParams};
use std::sync::Arc;

/// How the assistant turn is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// One complete message per call
    Blocking,
    /// Fragments folded in arrival order, each shown as it lands
    Streaming,
}

pub struct ModelGateway {
    service: Arc<dyn LlmService>,
    system_prompt: Option<String>,
    sampling: SamplingParams,
    mode: ResponseMode,
}

impl ModelGateway {
    pub fn new(service: Arc<dyn LlmService>, sampling: SamplingParams) -> Self {
        Self {
            service,
            system_prompt: None,
            sampling,
            mode: ResponseMode::Blocking,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.mode == ResponseMode::Streaming
    }

    pub fn model_id(&self) -> &str {
        self.service.model_id()
    }

    /// Shape the request: every turn in order, roles mapped to the wire
    /// vocabulary
    pub fn build_request(&self, turns: &[Turn]) -> LlmRequest {
        LlmRequest {
            system: self.system_prompt.clone(),
            messages: turns
                .iter()
                .map(|turn| LlmMessage::new(turn.role.wire_role(), turn.text.clone()))
                .collect(),
            sampling: self.sampling.clone(),
        }
    }

    /// Produce the next assistant turn.
    ///
    /// In streaming mode every fragment is handed to `on_fragment` before it
    /// is folded in; blocking mode never calls it. Errors propagate as-is.
    pub async fn respond(
        &self,
        conversation: &Conversation,
        on_fragment: &mut (dyn FnMut(&str) + Send),
    ) -> Result<Turn, LlmError> {
        let request = self.build_request(conversation.turns());

        let text = match self.mode {
            ResponseMode::Blocking => self.service.complete(&request).await?.text,
            ResponseMode::Streaming => {
                let fragments = self.service.stream(&request).await?;
                fold_stream(fragments, on_fragment).await?
            }
        };

        Ok(Turn::assistant(text))
    }
}
