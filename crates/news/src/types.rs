//! Core types for the article corpus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One crawled page as stored in the article table.
///
/// A row whose `text` is `None` is a tombstone: the URL was fetched but did
/// not yield an article. Tombstones block re-fetching and never show up in
/// search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub hostname: String,

    /// Published timestamp as extracted from the page (free-form)
    pub publish_date: Option<String>,

    /// Time the row was written
    pub crawl_date: DateTime<Utc>,

    /// Language tag of the page (e.g. "es", "en-US")
    pub language: Option<String>,

    /// English translation, only for non-English articles
    pub translation: Option<String>,

    /// English summary, only when `text` is present
    pub summary: Option<String>,
}

impl Article {
    /// Build the tombstone row for a page that is not an article.
    pub fn tombstone(
        url: impl Into<String>,
        hostname: impl Into<String>,
        crawl_date: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            title: None,
            text: None,
            hostname: hostname.into(),
            publish_date: None,
            crawl_date,
            language: None,
            translation: None,
            summary: None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.text.is_none()
    }
}

/// A ranked retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub rowid: i64,

    /// Full-text relevance; lower is more relevant
    pub raw_rank: f64,

    /// Age of the article in days, never below 1
    pub staleness_days: f64,

    /// Recency factor in (0, 1]
    pub time_bias: f64,

    /// `raw_rank * time_bias`; results are ordered ascending on this
    pub final_score: f64,

    pub title: String,
    pub url: String,
    pub hostname: String,
    pub summary: Option<String>,
    pub publish_date: Option<String>,
    pub language: Option<String>,
}

/// What the extractor pulls out of one HTML page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInfo {
    /// "article" for news articles, anything else otherwise
    pub kind: String,
    pub title: Option<String>,
    pub text: String,

    /// Lower bound of the published timestamp
    pub published: Option<String>,
    pub language: Option<String>,

    /// Absolute outbound links in document order
    pub links: Vec<String>,
}

impl PageInfo {
    pub fn is_article(&self) -> bool {
        self.kind == "article"
    }
}

/// Result of adding one URL to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Article inserted with text, summary, and (maybe) translation
    Inserted { rowid: i64, links: Vec<String> },

    /// Page was not an article; a tombstone row was written
    Tombstoned { rowid: i64, links: Vec<String> },

    /// URL already present and duplicates were not allowed
    Skipped,
}

impl AddOutcome {
    /// Links discovered on the page (empty for skipped URLs).
    pub fn links(&self) -> &[String] {
        match self {
            AddOutcome::Inserted { links, .. } | AddOutcome::Tombstoned { links, .. } => links,
            AddOutcome::Skipped => &[],
        }
    }
}

/// Per-URL result once errors have been contained.
#[derive(Debug)]
pub enum UrlOutcome {
    Done(AddOutcome),
    Failed { url: String, error: String },
}

/// Counters for one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub inserted: usize,
    pub tombstoned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CrawlReport {
    pub fn record(&mut self, outcome: &UrlOutcome) {
        match outcome {
            UrlOutcome::Done(AddOutcome::Inserted { .. }) => self.inserted += 1,
            UrlOutcome::Done(AddOutcome::Tombstoned { .. }) => self.tombstoned += 1,
            UrlOutcome::Done(AddOutcome::Skipped) => self.skipped += 1,
            UrlOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Number of URLs visited, whatever their outcome.
    pub fn visited(&self) -> usize {
        self.inserted + self.tombstoned + self.skipped + self.failed
    }
}
