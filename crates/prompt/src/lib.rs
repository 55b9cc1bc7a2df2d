//! Prompt system for ragnews.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions (system and user templates)
//! - Handlebars template rendering
//! - Built-in news prompts that a prompts directory can override

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptOutputSpec};

/// Built-in prompt ids.
pub mod ids {
    pub const KEYWORDS: &str = "news.keywords";
    pub const ANSWER: &str = "news.answer";
    pub const SUMMARIZE: &str = "news.summarize";
    pub const TRANSLATE: &str = "news.translate";
    pub const CLOZE: &str = "news.cloze";
}
