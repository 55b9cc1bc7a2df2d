//! RAG answering orchestration.
//!
//! Stages run strictly in order: validate, extract keywords, search, check
//! that something was found, synthesize. The first failure stops the
//! pipeline and is returned unchanged.

use crate::rag::keywords::extract_keywords;
use crate::rag::synthesize::synthesize;
use crate::rag::types::{RagAnswer, RagOptions, RagStage};
use crate::runner::PromptRunner;
use crate::{ranker, store::ArticleStore};
use chrono::Utc;
use ragnews_core::{AppError, AppResult};

/// Answer `question` from the articles in `store`.
///
/// Keywords are extracted from `keywords_text` when given, otherwise from
/// `question` itself. Parameters are checked before any model call or query.
pub async fn rag(
    runner: &PromptRunner<'_>,
    store: &ArticleStore,
    question: &str,
    keywords_text: Option<&str>,
    options: &RagOptions,
) -> AppResult<RagAnswer> {
    tracing::info!("RAG answering question: {}", question);

    validate(question, options).map_err(failed(RagStage::Validate))?;

    let keywords = extract_keywords(runner, keywords_text.unwrap_or(question), options.seed)
        .await
        .map_err(failed(RagStage::ExtractKeywords))?;

    let now = Utc::now();
    let hits = store
        .search(&keywords, options.limit, options.timebias_alpha, now)
        .map_err(failed(RagStage::Search))?;

    if hits.is_empty() {
        return Err(failed(RagStage::AssertNonempty)(AppError::EmptyRetrieval(
            keywords,
        )));
    }

    tracing::info!(
        stage = %RagStage::Search,
        hits = hits.len(),
        best_score = hits[0].final_score,
        "Retrieved articles"
    );

    let answer = synthesize(runner, question, &hits, now)
        .await
        .map_err(failed(RagStage::Synthesize))?;

    Ok(RagAnswer {
        answer,
        keywords,
        hits,
    })
}

fn validate(question: &str, options: &RagOptions) -> AppResult<()> {
    if question.trim().is_empty() {
        return Err(AppError::InvalidParameter(
            "question must not be empty".to_string(),
        ));
    }
    if options.limit == 0 {
        return Err(AppError::InvalidParameter(
            "limit must be at least 1".to_string(),
        ));
    }
    ranker::validate_alpha(options.timebias_alpha)
}

/// Log a failure against the stage it happened in and pass it through.
fn failed(stage: RagStage) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        tracing::warn!(stage = %stage, error = %err, "RAG pipeline failed");
        err
    }
}
