//! Groq provider, spoken over its `OpenAI`-compatible chat completions API

use super::stream::TextStream;
use super::types::{LlmRequest, LlmResponse, ReasoningEffort, TokenLimitField, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{future, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

const STREAM_DONE: &str = "[DONE]";

/// OpenAI-compatible chat completions client
pub struct GroqService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqService {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    fn translate_request(&self, request: &LlmRequest, stream: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }

        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: m.content.clone(),
        }));

        let sampling = &request.sampling;
        let (max_tokens, max_completion_tokens) = match sampling.token_limit_field {
            TokenLimitField::MaxTokens => (Some(sampling.max_tokens), None),
            TokenLimitField::MaxCompletionTokens => (None, Some(sampling.max_tokens)),
        };

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens,
            max_completion_tokens,
            reasoning_effort: sampling.reasoning_effort,
            stream,
        }
    }

    /// POST the request and turn non-success statuses into classified errors
    async fn send(&self, body: &ChatRequest) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if let Ok(error_resp) = serde_json::from_str::<ChatErrorResponse>(&body) {
            return Err(LlmError::from_status(status.as_u16(), &error_resp.error.message));
        }
        Err(LlmError::from_status(status.as_u16(), &body))
    }

    fn normalize_response(resp: ChatResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No choices in response"))?;

        let text = choice.message.content.unwrap_or_else(|| {
            tracing::warn!("Completion carried no message content");
            String::new()
        });

        let usage = resp.usage.unwrap_or_default();

        Ok(LlmResponse {
            text,
            end_turn: choice.finish_reason.as_deref() == Some("stop"),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

#[async_trait]
impl LlmService for GroqService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.translate_request(request, false);
        let response = self.send(&body).await?;

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        let chat_response: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {text}"))
        })?;

        Self::normalize_response(chat_response)
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        let body = self.translate_request(request, true);
        let response = self.send(&body).await?;
        Ok(fragments_from_sse(response.bytes_stream()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Turn a raw SSE byte stream into content fragments.
///
/// Stops at the `[DONE]` sentinel or when the transport ends, whichever
/// comes first. Chunks without content (role announcements, usage trailers)
/// are skipped.
pub(crate) fn fragments_from_sse<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let fragments = bytes
        .eventsource()
        .take_while(|event| future::ready(!matches!(event, Ok(e) if e.data.trim() == STREAM_DONE)))
        .filter_map(|event| {
            future::ready(match event {
                Ok(event) => parse_chunk(&event.data),
                Err(e) => Some(Err(LlmError::network(format!("SSE stream error: {e}")))),
            })
        });
    Box::pin(fragments)
}

/// Parse one SSE `data:` payload
fn parse_chunk(data: &str) -> Option<Result<String, LlmError>> {
    let chunk: ChatChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(LlmError::unknown(format!(
                "SSE parsing error: {e}, data: {data}"
            ))))
        }
    };

    if let Some(error) = chunk.error {
        return Some(Err(LlmError::server_error(format!(
            "SSE API error: {}",
            error.message
        ))));
    }

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
        .map(Ok)
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<ReasoningEffort>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[allow(clippy::struct_field_names)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    error: ChatError,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}
