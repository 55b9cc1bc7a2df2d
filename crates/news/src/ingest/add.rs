//! Adding a single URL to the store.

use crate::ingest::extract::ArticleExtractor;
use crate::ingest::fetch::{hostname, normalize_url, PageFetcher};
use crate::runner::PromptRunner;
use crate::store::ArticleStore;
use crate::types::{AddOutcome, Article, PageInfo};
use chrono::Utc;
use ragnews_core::AppResult;
use ragnews_prompt::ids;
use serde_json::json;

/// Pages with less body text than this are stored as tombstones.
pub const MIN_ARTICLE_CHARS: usize = 100;

/// Everything ingestion needs, borrowed from the caller.
pub struct Ingestor<'a> {
    store: &'a ArticleStore,
    runner: PromptRunner<'a>,
    fetcher: &'a dyn PageFetcher,
    extractor: &'a dyn ArticleExtractor,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        store: &'a ArticleStore,
        runner: PromptRunner<'a>,
        fetcher: &'a dyn PageFetcher,
        extractor: &'a dyn ArticleExtractor,
    ) -> Self {
        Self {
            store,
            runner,
            fetcher,
            extractor,
        }
    }

    /// Download `url`, extract it, and append one row to the store.
    ///
    /// Unless `allow_dupes` is set, a URL already present (tombstones
    /// included) is skipped without fetching. Non-article pages become
    /// tombstones. Articles get an English summary and, when the page is not
    /// in English, an English translation. The page's outbound links are
    /// returned for crawling.
    pub async fn add_url(&self, url: &str, allow_dupes: bool) -> AppResult<AddOutcome> {
        tracing::info!("add_url {}", url);

        let url = normalize_url(url)?;
        let url_str = url.to_string();

        if !allow_dupes && self.store.contains_url(&url_str)? {
            tracing::debug!(url = %url_str, "Duplicate detected, skipping");
            return Ok(AddOutcome::Skipped);
        }

        let html = self.fetcher.fetch(&url).await?;
        let info = self.extractor.extract(&html, &url)?;
        let host = hostname(&url);

        if !info.is_article() || info.text.chars().count() < MIN_ARTICLE_CHARS {
            tracing::debug!(url = %url_str, kind = %info.kind, "Not an article, storing tombstone");
            let rowid = self
                .store
                .insert(&Article::tombstone(url_str, host, Utc::now()))?;
            return Ok(AddOutcome::Tombstoned {
                rowid,
                links: info.links,
            });
        }

        let translation = self.translate_if_needed(&info).await?;

        tracing::debug!(url = %url_str, "Summarizing");
        let summary = self
            .runner
            .run(ids::SUMMARIZE, &json!({ "text": info.text }), None)
            .await?;

        let PageInfo {
            title,
            text,
            published,
            language,
            links,
            ..
        } = info;

        let rowid = self.store.insert(&Article {
            url: url_str,
            title,
            text: Some(text),
            hostname: host,
            publish_date: published,
            crawl_date: Utc::now(),
            language,
            translation,
            summary: Some(summary),
        })?;

        tracing::info!(rowid, "Article stored");
        Ok(AddOutcome::Inserted { rowid, links })
    }

    /// Translate non-English pages. Pages with no language tag are left alone.
    async fn translate_if_needed(&self, info: &PageInfo) -> AppResult<Option<String>> {
        let Some(language) = info.language.as_deref() else {
            return Ok(None);
        };
        if language.to_ascii_lowercase().starts_with("en") {
            return Ok(None);
        }

        tracing::debug!(language, "Translating to English");
        let translation = self
            .runner
            .run(ids::TRANSLATE, &json!({ "text": info.text }), None)
            .await?;
        Ok(Some(translation))
    }
}
