//! Question answering handlers: single-shot and interactive.

use super::Session;
use ragnews_core::AppResult;
use ragnews_news::rag;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const PROMPT: &str = "ragnews> ";

/// Answer one question and print the answer to stdout.
pub async fn execute(session: &Session<'_>, question: &str) -> AppResult<()> {
    answer(session, question, &mut std::io::stdout()).await
}

async fn answer(session: &Session<'_>, question: &str, out: &mut impl Write) -> AppResult<()> {
    tracing::info!("Executing query");

    let result = rag(
        &session.runner,
        session.store,
        question,
        None,
        &session.rag_options(),
    )
    .await?;

    if session.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(out, "{}", result.answer)?;
    }

    tracing::debug!(
        keywords = %result.keywords,
        articles = result.hits.len(),
        "Answered from retrieved articles"
    );
    Ok(())
}

/// Read questions from stdin until EOF, answering each in turn.
pub async fn interactive(session: &Session<'_>) -> AppResult<()> {
    let input = BufReader::new(tokio::io::stdin());
    answer_lines(session, input, &mut std::io::stdout(), &mut std::io::stderr()).await?;
    Ok(())
}

/// Prompt-and-answer loop over `input`; returns how many questions were asked.
///
/// Blank lines are ignored. A failed question is reported on `err` and the
/// loop moves on to the next one.
pub async fn answer_lines<R: AsyncBufRead + Unpin>(
    session: &Session<'_>,
    input: R,
    out: &mut impl Write,
    err: &mut impl Write,
) -> AppResult<usize> {
    let mut lines = input.lines();
    let mut asked = 0;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        asked += 1;
        if let Err(e) = answer(session, question, out).await {
            tracing::debug!("Question failed: {:?}", e);
            writeln!(err, "error: {}", e)?;
        }
    }

    Ok(asked)
}
