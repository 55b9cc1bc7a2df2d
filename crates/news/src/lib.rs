//! News article corpus with retrieval-augmented answering.
//!
//! Articles are crawled into a SQLite FTS5 store, searched with a
//! recency-weighted ranking, and handed to a language model that answers
//! questions from them.
//!
//! # Example
//! ```no_run
//! use ragnews_news::{rag, ArticleStore, PromptRunner, RagOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ragnews_llm::create_client("groq", None, std::env::var("GROQ_API_KEY").ok().as_deref())?;
//! let store = ArticleStore::open(std::path::Path::new("ragnews.db"))?;
//! let runner = PromptRunner::new(client.as_ref(), "llama-3.3-70b-versatile");
//!
//! let result = rag(&runner, &store, "Who is the democratic nominee?", None, &RagOptions::default()).await?;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod cloze;
pub mod ingest;
pub mod rag;
pub mod ranker;
pub mod runner;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ingest::{ArticleExtractor, HtmlExtractor, HttpFetcher, Ingestor, PageFetcher};
pub use rag::{extract_keywords, rag, synthesize, RagAnswer, RagOptions};
pub use runner::PromptRunner;
pub use store::ArticleStore;
pub use types::{AddOutcome, Article, CrawlReport, PageInfo, SearchHit, UrlOutcome};
