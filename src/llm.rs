//! LLM provider abstraction
//!
//! Provides a common interface over the hosted completion endpoint, in
//! blocking and streaming flavors.

mod config;
mod error;
mod groq;
mod stream;
mod types;

pub use config::LlmConfig;
pub use error::{LlmError, LlmErrorKind};
pub use groq::GroqService;
pub use stream::{fold_stream, TextStream};
pub use types::*;

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request and wait for the whole message
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Make a streaming completion request.
    ///
    /// Resolves once the response headers arrive; the returned stream yields
    /// text fragments in arrival order and ends when the server does.
    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    end_turn = response.end_turn,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        let start = std::time::Instant::now();
        let model = self.model_id.clone();

        match self.inner.stream(request).await {
            Ok(fragments) => {
                tracing::info!(
                    model = %model,
                    first_byte_ms = %start.elapsed().as_millis(),
                    "LLM stream opened"
                );
                let mut count = 0usize;
                let logged = fragments.inspect(move |item| match item {
                    Ok(_) => {
                        count += 1;
                        tracing::trace!(model = %model, fragments = count, "LLM fragment");
                    }
                    Err(e) => {
                        tracing::error!(model = %model, error = %e.message, "LLM stream failed");
                    }
                });
                Ok(Box::pin(logged))
            }
            Err(e) => {
                tracing::error!(
                    model = %model,
                    duration_ms = %start.elapsed().as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM stream request failed"
                );
                Err(e)
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
