//! Command handlers for the ragnews CLI.
//!
//! Each mode of the binary lives in its own submodule and works against a
//! shared [`Session`] built once in `main`.

pub mod ask;
pub mod cloze;
pub mod ingest;
pub mod stats;

use ragnews_core::config::AppConfig;
use ragnews_news::{ArticleStore, PromptRunner, RagOptions};

/// Process-wide state every command borrows.
pub struct Session<'a> {
    pub config: &'a AppConfig,
    pub store: &'a ArticleStore,
    pub runner: PromptRunner<'a>,
    pub json: bool,
}

impl Session<'_> {
    pub fn rag_options(&self) -> RagOptions {
        RagOptions::from(&self.config.retrieval)
    }
}
