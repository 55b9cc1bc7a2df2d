//! Page ingestion: fetch, extract, summarize, store, and crawl.

pub mod add;
pub mod crawl;
pub mod extract;
pub mod fetch;

pub use add::{Ingestor, MIN_ARTICLE_CHARS};
pub use crawl::contain;
pub use extract::{ArticleExtractor, HtmlExtractor};
pub use fetch::{hostname, normalize_url, HttpFetcher, PageFetcher};
