//! Ingestion command handler.

use super::Session;
use ragnews_core::AppResult;
use ragnews_news::{HtmlExtractor, HttpFetcher, Ingestor};

/// Add `url` (duplicates allowed) and crawl its links `recursive_depth` hops.
///
/// Per-URL failures are logged and counted; only setup errors abort.
pub async fn execute(session: &Session<'_>, url: &str, recursive_depth: u32) -> AppResult<()> {
    tracing::info!(url, recursive_depth, "Executing ingestion");

    let fetcher = HttpFetcher::new()?;
    let ingestor = Ingestor::new(session.store, session.runner, &fetcher, &HtmlExtractor);
    let report = ingestor.crawl(url, recursive_depth, true).await;

    if session.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "inserted={} tombstoned={} skipped={} failed={}",
            report.inserted, report.tombstoned, report.skipped, report.failed
        );
    }

    Ok(())
}
