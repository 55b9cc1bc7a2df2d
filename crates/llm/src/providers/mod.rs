//! Concrete LLM providers.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiCompatClient;
