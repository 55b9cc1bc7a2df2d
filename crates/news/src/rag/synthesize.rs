//! Prompt assembly and the final answer call.

use crate::runner::PromptRunner;
use crate::types::SearchHit;
use chrono::{DateTime, SecondsFormat, Utc};
use ragnews_core::{AppError, AppResult};
use ragnews_prompt::ids;
use serde_json::{json, Value};

/// Answer `question` from `hits`, which must already be in ranked order.
///
/// Fails with `EmptyRetrieval` before touching the model when `hits` is
/// empty; otherwise makes exactly one model call and returns its text as-is.
pub async fn synthesize(
    runner: &PromptRunner<'_>,
    question: &str,
    hits: &[SearchHit],
    now: DateTime<Utc>,
) -> AppResult<String> {
    if hits.is_empty() {
        return Err(AppError::EmptyRetrieval(question.to_string()));
    }

    tracing::debug!(articles = hits.len(), "Synthesizing answer");
    runner
        .run(ids::ANSWER, &answer_variables(question, hits, now), None)
        .await
}

fn answer_variables(question: &str, hits: &[SearchHit], now: DateTime<Utc>) -> Value {
    let articles: Vec<Value> = hits
        .iter()
        .map(|hit| {
            json!({
                "url": hit.url,
                "title": hit.title,
                "summary": hit.summary,
            })
        })
        .collect();

    json!({
        "now": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        "question": question,
        "articles": articles,
    })
}
