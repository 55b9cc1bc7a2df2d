//! Retrieval-augmented answering over the article store.

pub mod keywords;
pub mod pipeline;
pub mod synthesize;
pub mod types;

pub use keywords::{extract_keywords, normalize_keywords};
pub use pipeline::rag;
pub use synthesize::synthesize;
pub use types::{RagAnswer, RagOptions, RagStage};
