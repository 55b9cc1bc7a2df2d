//! Question to search-keyword extraction.

use crate::runner::PromptRunner;
use ragnews_core::AppResult;
use ragnews_prompt::ids;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static NON_WORD: OnceLock<Regex> = OnceLock::new();

/// Ask the model for the most important words of `question`.
///
/// Makes exactly one model call. The reply is normalized with
/// [`normalize_keywords`] so it can go straight into a full-text query.
pub async fn extract_keywords(
    runner: &PromptRunner<'_>,
    question: &str,
    seed: Option<u64>,
) -> AppResult<String> {
    let raw = runner
        .run(ids::KEYWORDS, &json!({ "text": question }), seed)
        .await?;

    let keywords = normalize_keywords(&raw);
    tracing::info!(keywords = %keywords, "Extracted keywords");
    Ok(keywords)
}

/// Collapse every run of non-word characters into one space.
pub fn normalize_keywords(raw: &str) -> String {
    let re = NON_WORD.get_or_init(|| Regex::new(r"\W+").expect("static regex"));
    re.replace_all(raw, " ").trim().to_string()
}
