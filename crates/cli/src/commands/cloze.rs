//! Cloze command handler.

use super::Session;
use ragnews_core::AppResult;
use ragnews_news::cloze;

/// Predict the masked tokens of `masked_text` and print them space separated.
pub async fn execute(session: &Session<'_>, masked_text: &str, labels: &[String]) -> AppResult<()> {
    let labels: Vec<String> = labels
        .iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();
    tracing::debug!(?labels, "Cloze labels");

    let tokens = cloze::predict(
        &session.runner,
        session.store,
        masked_text,
        &labels,
        &session.rag_options(),
    )
    .await?;

    if session.json {
        println!("{}", serde_json::to_string(&tokens)?);
    } else {
        println!("{}", tokens.join(" "));
    }

    Ok(())
}
