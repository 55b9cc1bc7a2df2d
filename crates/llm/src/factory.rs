//! LLM provider factory.
//!
//! Builds the one client a ragnews invocation uses for every model call.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiCompatClient};
use crate::types::ProviderType;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// A missing key is not rejected here. Hosted providers report an
/// authentication failure on their first call instead, so commands that never
/// reach the model (stats, empty retrievals) still work without credentials.
///
/// # Errors
/// Returns error if the provider is unknown.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;
    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());

    match provider_type {
        ProviderType::Ollama => Ok(Arc::new(OllamaClient::with_base_url(base_url))),
        ProviderType::Groq | ProviderType::OpenAI => Ok(Arc::new(OpenAiCompatClient::new(
            provider_type.as_str(),
            base_url,
            api_key.map(str::to_string),
        ))),
    }
}
