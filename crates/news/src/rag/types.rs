//! RAG request and response types.

use crate::types::SearchHit;
use ragnews_core::config::RetrievalConfig;
use serde::Serialize;
use std::fmt;

/// Retrieval settings for one question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RagOptions {
    /// Maximum number of articles handed to the synthesizer
    pub limit: usize,

    /// Recency decay constant; smaller values favour newer articles more
    pub timebias_alpha: f64,

    /// Seed forwarded to the keyword extraction call
    pub seed: Option<u64>,
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            timebias_alpha: 1.0,
            seed: None,
        }
    }
}

impl From<&RetrievalConfig> for RagOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            limit: config.limit,
            timebias_alpha: config.timebias_alpha,
            seed: None,
        }
    }
}

/// Answer plus the evidence it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    pub answer: String,

    /// Normalized search string used against the store
    pub keywords: String,

    /// Articles passed to the synthesizer, in ranked order
    pub hits: Vec<SearchHit>,
}

/// Pipeline stages, used to label log lines and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RagStage {
    Validate,
    ExtractKeywords,
    Search,
    AssertNonempty,
    Synthesize,
}

impl fmt::Display for RagStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RagStage::Validate => "validate",
            RagStage::ExtractKeywords => "extract_keywords",
            RagStage::Search => "search",
            RagStage::AssertNonempty => "assert_nonempty",
            RagStage::Synthesize => "synthesize",
        };
        f.write_str(name)
    }
}
