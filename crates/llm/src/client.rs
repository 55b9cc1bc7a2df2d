//! LLM client abstraction and request/response types.
//!
//! Every model call in ragnews is a single chat turn: an optional system
//! instruction plus one user message, answered with one block of text.

use ragnews_core::AppResult;
use serde::{Deserialize, Serialize};

/// LLM completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The user message sent to the LLM
    pub prompt: String,

    /// Model identifier (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// System instruction (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling seed for reproducible output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            seed: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set (or clear) the sampling seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations never retry: a transport, authentication, or rate-limit
/// failure is returned as `AppError::Llm` on the first attempt.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "groq", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a single non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
