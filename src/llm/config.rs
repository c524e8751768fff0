//! Provider configuration

use super::groq::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use super::{GroqService, LlmError, LlmService, LoggingService};
use std::sync::Arc;

/// Configuration for the completion endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: get("GROQ_API_KEY"),
            base_url: get("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: get("GROQ_MODEL").unwrap_or(defaults.model),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    /// Create the logged service for this configuration.
    ///
    /// Fails before any request is made when no API key is configured.
    pub fn build_service(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| LlmError::auth("GROQ_API_KEY is not set"))?;

        let service = GroqService::new(api_key, self.model.clone(), self.base_url.clone())?;
        Ok(Arc::new(LoggingService::new(Arc::new(service))))
    }
}
