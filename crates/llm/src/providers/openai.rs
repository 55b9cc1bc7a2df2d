//! OpenAI-compatible chat completions provider.
//!
//! Groq and OpenAI share the `/chat/completions` wire format, so one client
//! serves both; only the base URL and the provider label differ.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ragnews_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Chat message in OpenAI format.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct OpenAiCompatClient {
    /// Provider label used in logs and errors ("groq", "openai")
    provider: String,

    /// Base URL, without the `/chat/completions` suffix
    base_url: String,

    /// Bearer token; checked on every call rather than at construction
    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a client for `provider` rooted at `base_url`.
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert LlmRequest to the chat completions format.
    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            seed: request.seed,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(&self, response: ChatResponse) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Llm(format!("{} returned a completion with no content", self.provider))
            })?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model,
            usage,
        })
    }
}

/// Map a non-success HTTP status to a model-call error.
fn http_error(provider: &str, status: reqwest::StatusCode, body: &str) -> AppError {
    match status.as_u16() {
        401 | 403 => AppError::Llm(format!(
            "{} authentication failed ({}): {}",
            provider, status, body
        )),
        429 => AppError::Llm(format!("{} rate limit exceeded: {}", provider, body)),
        _ => AppError::Llm(format!("{} API error ({}): {}", provider, status, body)),
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Llm(format!(
                "{} authentication failed: no API key configured",
                self.provider
            ))
        })?;

        tracing::info!(provider = %self.provider, model = %request.model, "Sending chat completion request");
        tracing::debug!("Request: {:?}", request);

        let body = self.to_chat_request(request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!("Failed to send request to {}: {}", self.provider, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(http_error(&self.provider, status, &error_text));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse {} response: {}", self.provider, e))
        })?;

        tracing::info!(provider = %self.provider, "Received chat completion");
        tracing::debug!("Response: {:?}", chat_response);

        self.convert_response(chat_response)
    }
}
