//! Local Ollama runtime, spoken to through its `/api/chat` endpoint.
//!
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ragnews_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Sampling knobs; Ollama takes these under `options`, not at the top level.
#[derive(Debug, Default, Serialize)]
struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatBody {
    model: String,
    messages: Vec<Message>,
    options: SamplingOptions,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    model: String,
    message: Message,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at another Ollama host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn chat_body(&self, request: &LlmRequest) -> ChatBody {
        let system = request.system.iter().map(|text| Message {
            role: "system".to_string(),
            content: text.clone(),
        });
        let user = Message {
            role: "user".to_string(),
            content: request.prompt.clone(),
        };

        ChatBody {
            model: request.model.clone(),
            messages: system.chain(std::iter::once(user)).collect(),
            options: SamplingOptions {
                seed: request.seed,
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
            stream: false,
        }
    }

    fn into_response(reply: ChatReply) -> LlmResponse {
        LlmResponse {
            content: reply.message.content,
            model: reply.model,
            usage: LlmUsage::new(
                reply.prompt_eval_count.unwrap_or(0),
                reply.eval_count.unwrap_or(0),
            ),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let url = format!("{}/api/chat", self.base_url);
        tracing::info!(model = %request.model, %url, "Sending chat request to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&self.chat_body(request))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Ollama unreachable at {}: {}", self.base_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!("Ollama returned {}: {}", status, body)));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Malformed Ollama reply: {}", e)))?;
        tracing::debug!(
            prompt_tokens = ?reply.prompt_eval_count,
            completion_tokens = ?reply.eval_count,
            "Ollama reply received"
        );

        Ok(Self::into_response(reply))
    }
}
