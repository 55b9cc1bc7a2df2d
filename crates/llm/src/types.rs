//! Provider identification.

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Groq,
    OpenAI,
    Ollama,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Base URL used when no endpoint is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434",
        }
    }
}
