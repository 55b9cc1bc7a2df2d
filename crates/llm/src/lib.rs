//! LLM integration crate for ragnews.
//!
//! This crate provides a provider-agnostic abstraction for chat-style model
//! calls: a system instruction and a user message in, text out.
//!
//! # Providers
//! - **Groq** (default): OpenAI-compatible chat completions
//! - **OpenAI**: same wire format, different endpoint
//! - **Ollama**: local runtime
//!
//! # Example
//! ```no_run
//! use ragnews_llm::{create_client, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = std::env::var("GROQ_API_KEY").ok();
//! let client = create_client("groq", None, key.as_deref())?;
//! let request = LlmRequest::new("Hello, world!", "llama-3.3-70b-versatile")
//!     .with_system("Answer in one sentence.");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiCompatClient};
pub use types::ProviderType;
