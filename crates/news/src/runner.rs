//! Prompt-driven model calls.

use ragnews_core::AppResult;
use ragnews_llm::{LlmClient, LlmRequest};
use ragnews_prompt::{build_prompt, load_prompt};
use serde_json::Value;
use std::path::Path;

/// Renders a named prompt and sends it to the model.
///
/// Holds borrowed handles only: the client and settings are built once at
/// startup and shared by every component that talks to the model.
#[derive(Clone, Copy)]
pub struct PromptRunner<'a> {
    client: &'a dyn LlmClient,
    model: &'a str,
    prompts_dir: Option<&'a Path>,
}

impl<'a> PromptRunner<'a> {
    pub fn new(client: &'a dyn LlmClient, model: &'a str) -> Self {
        Self {
            client,
            model,
            prompts_dir: None,
        }
    }

    /// Look for prompt overrides in `prompts_dir` before the built-ins.
    pub fn with_prompts_dir(mut self, prompts_dir: Option<&'a Path>) -> Self {
        self.prompts_dir = prompts_dir;
        self
    }

    /// Render only the user message of a prompt.
    pub fn render_user(&self, prompt_id: &str, variables: &Value) -> AppResult<String> {
        let definition = load_prompt(self.prompts_dir, prompt_id)?;
        Ok(build_prompt(&definition, variables)?.user)
    }

    /// Render `prompt_id` and make exactly one model call.
    pub async fn run(
        &self,
        prompt_id: &str,
        variables: &Value,
        seed: Option<u64>,
    ) -> AppResult<String> {
        let definition = load_prompt(self.prompts_dir, prompt_id)?;
        let built = build_prompt(&definition, variables)?;

        tracing::debug!(prompt = prompt_id, "SYSTEM: {}", built.system.as_deref().unwrap_or(""));
        tracing::debug!(prompt = prompt_id, "USER: {}", built.user);

        let mut request = LlmRequest::new(built.user, self.model).with_seed(seed);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let response = self.client.complete(&request).await?;

        tracing::info!(
            prompt = prompt_id,
            provider = self.client.provider_name(),
            tokens = response.usage.total_tokens,
            "Model call completed"
        );

        Ok(response.content)
    }
}
