//! Mock implementations for testing
//!
//! These mocks enable runtime and gateway tests without real I/O.

use super::traits::TurnObserver;
use crate::conversation::{Conversation, Turn};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService, TextStream, Usage};
use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock LLM Service
// ============================================================================

enum QueuedReply {
    Text(String),
    Fragments(Vec<String>),
    /// Stream opens, yields the fragments, then fails
    BrokenStream(Vec<String>, LlmError),
    Error(LlmError),
}

/// Mock service that returns queued replies in order
pub struct MockLlmService {
    replies: Mutex<VecDeque<QueuedReply>>,
    model_id: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a complete reply; streamed as a single fragment
    pub fn queue_text(&self, text: &str) {
        self.push(QueuedReply::Text(text.to_string()));
    }

    /// Queue a reply that streams fragment by fragment
    pub fn queue_fragments(&self, fragments: &[&str]) {
        self.push(QueuedReply::Fragments(
            fragments.iter().map(ToString::to_string).collect(),
        ));
    }

    /// Queue a stream that breaks after `fragments`
    pub fn queue_broken_stream(&self, fragments: &[&str], error: LlmError) {
        self.push(QueuedReply::BrokenStream(
            fragments.iter().map(ToString::to_string).collect(),
            error,
        ));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.push(QueuedReply::Error(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, reply: QueuedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn next_reply(&self, request: &LlmRequest) -> QueuedReply {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| QueuedReply::Error(LlmError::network("No mock response queued")))
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let text = match self.next_reply(request) {
            QueuedReply::Text(text) => text,
            QueuedReply::Fragments(fragments) => fragments.concat(),
            QueuedReply::BrokenStream(_, e) | QueuedReply::Error(e) => return Err(e),
        };
        Ok(LlmResponse {
            text,
            end_turn: true,
            usage: Usage::default(),
        })
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        let (fragments, tail) = match self.next_reply(request) {
            QueuedReply::Text(text) => (vec![text], None),
            QueuedReply::Fragments(fragments) => (fragments, None),
            QueuedReply::BrokenStream(fragments, e) => (fragments, Some(e)),
            QueuedReply::Error(e) => return Err(e),
        };
        let items = fragments.into_iter().map(Ok).chain(tail.map(Err));
        Ok(stream::iter(items).boxed())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Recording Observer
// ============================================================================

#[derive(Default)]
struct ObserverRecord {
    stream_starts: usize,
    fragments: Vec<String>,
    turns: Vec<Turn>,
    session_end_turns: Option<usize>,
}

/// Shared view of what a [`RecordingObserver`] saw
#[derive(Clone, Default)]
pub struct ObserverLog(Arc<Mutex<ObserverRecord>>);

impl ObserverLog {
    pub fn stream_starts(&self) -> usize {
        self.0.lock().unwrap().stream_starts
    }

    pub fn fragments(&self) -> Vec<String> {
        self.0.lock().unwrap().fragments.clone()
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.0.lock().unwrap().turns.clone()
    }

    /// Conversation length seen at session end, if it ended
    pub fn session_end_turns(&self) -> Option<usize> {
        self.0.lock().unwrap().session_end_turns
    }
}

/// Observer that records every callback into an [`ObserverLog`]
pub struct RecordingObserver {
    log: ObserverLog,
}

impl RecordingObserver {
    pub fn new(log: ObserverLog) -> Self {
        Self { log }
    }
}

impl TurnObserver for RecordingObserver {
    fn on_stream_start(&mut self) {
        self.log.0.lock().unwrap().stream_starts += 1;
    }

    fn on_fragment(&mut self, fragment: &str) {
        self.log.0.lock().unwrap().fragments.push(fragment.to_string());
    }

    fn on_turn(&mut self, turn: &Turn) {
        self.log.0.lock().unwrap().turns.push(turn.clone());
    }

    fn on_session_end(&mut self, conversation: &Conversation) -> std::io::Result<()> {
        self.log.0.lock().unwrap().session_end_turns = Some(conversation.len());
        Ok(())
    }
}
