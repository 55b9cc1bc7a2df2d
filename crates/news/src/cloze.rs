//! Cloze-style evaluation: fill `[MASKn]` placeholders using the RAG pipeline.

use crate::rag::{rag, RagOptions};
use crate::runner::PromptRunner;
use crate::store::ArticleStore;
use ragnews_core::AppResult;
use ragnews_prompt::ids;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static MASK: OnceLock<Regex> = OnceLock::new();

/// Number of `[MASKn]` placeholders in `text`.
pub fn mask_count(text: &str) -> usize {
    let re = MASK.get_or_init(|| Regex::new(r"\[MASK\d+\]").expect("static regex"));
    re.find_iter(text).count()
}

/// Predict one token per mask, in mask order.
///
/// Text without masks returns an empty list and never calls the model.
/// Otherwise the cloze instruction becomes the question and the masked
/// sentence itself drives keyword extraction.
pub async fn predict(
    runner: &PromptRunner<'_>,
    store: &ArticleStore,
    masked_text: &str,
    valid_labels: &[String],
    options: &RagOptions,
) -> AppResult<Vec<String>> {
    let masks = mask_count(masked_text);
    if masks == 0 {
        tracing::debug!("No mask tokens in {:?}", masked_text);
        return Ok(Vec::new());
    }

    let question = runner.render_user(
        ids::CLOZE,
        &json!({
            "labels": valid_labels.join(", "),
            "masked_text": masked_text,
        }),
    )?;

    let result = rag(runner, store, &question, Some(masked_text), options).await?;
    let tokens = parse_tokens(&result.answer, masks);

    tracing::info!(masks, ?tokens, "Cloze prediction");
    Ok(tokens)
}

/// Whitespace-separated words with surrounding punctuation stripped.
fn parse_tokens(answer: &str, masks: usize) -> Vec<String> {
    answer
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .take(masks)
        .map(str::to_string)
        .collect()
}
