//! Stats command handler.

use super::Session;
use ragnews_core::AppResult;

/// Print how many articles and rows the store holds.
pub fn execute(session: &Session<'_>) -> AppResult<()> {
    let articles = session.store.count()?;
    let rows = session.store.row_count()?;
    tracing::debug!(articles, rows, "Store statistics");

    if session.json {
        let output = serde_json::json!({
            "db": session.config.db_path,
            "articles": articles,
            "tombstones": rows - articles,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{}: {} articles ({} tombstones)",
            session.config.db_path.display(),
            articles,
            rows - articles
        );
    }

    Ok(())
}
