//! SQLite FTS5 article store.

use crate::ranker;
use crate::types::{Article, SearchHit};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use ragnews_core::{AppError, AppResult};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS articles
USING FTS5 (
    title,
    text,
    hostname,
    url,
    publish_date,
    crawl_date,
    lang,
    en_translation,
    en_summary
);
"#;

// Staleness uses the older of publish and crawl dates; an unparseable or
// missing publish date falls back to the crawl date.
const SEARCH_SQL: &str = r#"
SELECT
    id, raw_rank, title, url, hostname, publish_date, lang, en_summary, staleness,
    time_bias(?1, staleness) AS timebias,
    raw_rank * time_bias(?1, staleness) AS final_score
FROM (
    SELECT
        rowid AS id,
        rank AS raw_rank,
        title, url, hostname, publish_date, lang, en_summary,
        MAX(1.0, ABS(
            MIN(COALESCE(julianday(publish_date), julianday(crawl_date)), julianday(crawl_date))
            - julianday(?3)
        )) AS staleness
    FROM articles
    WHERE articles MATCH ?2
      AND text IS NOT NULL
)
ORDER BY final_score ASC, id ASC
LIMIT ?4
"#;

/// Persistent, append-only article store.
pub struct ArticleStore {
    conn: Connection,
}

impl ArticleStore {
    /// Open (or create) the store at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Store(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Store(format!("Failed to open article store: {}", e)))?;

        tracing::debug!("Opened article store at {:?}", db_path);
        Self::init(conn)
    }

    /// Open a throwaway store that lives in memory.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Store(format!("Failed to open in-memory store: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> AppResult<Self> {
        conn.create_scalar_function(
            "time_bias",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let alpha = ctx.get::<f64>(0)?;
                let staleness = ctx.get::<f64>(1)?;
                Ok(ranker::time_bias(alpha, staleness))
            },
        )
        .map_err(|e| AppError::Store(format!("Failed to register time_bias: {}", e)))?;

        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// Create the article table. Safe to call on an existing store.
    pub fn create_schema(&self) -> AppResult<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| AppError::Store(format!("Failed to create schema: {}", e)))
    }

    /// Append one row and return its rowid.
    pub fn insert(&self, article: &Article) -> AppResult<i64> {
        let publish_date = article.publish_date.as_deref().map(normalize_timestamp);

        tracing::debug!(url = %article.url, tombstone = article.is_tombstone(), "Inserting article");

        self.conn
            .execute(
                "INSERT INTO articles (title, text, hostname, url, publish_date, crawl_date, lang, en_translation, en_summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    article.title,
                    article.text,
                    article.hostname,
                    article.url,
                    publish_date,
                    format_timestamp(&article.crawl_date),
                    article.language,
                    article.translation,
                    article.summary,
                ],
            )
            .map_err(|e| AppError::Store(format!("Failed to insert article: {}", e)))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// True if any row, tombstones included, has this url.
    pub fn contains_url(&self, url: &str) -> AppResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM articles WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Store(format!("Failed to look up url: {}", e)))?;

        Ok(count > 0)
    }

    /// Number of searchable articles (tombstones excluded).
    pub fn count(&self) -> AppResult<usize> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM articles WHERE text IS NOT NULL",
                [],
                |row| row.get::<_, i64>(0).map(|v| v as usize),
            )
            .map_err(|e| AppError::Store(format!("Failed to count articles: {}", e)))
    }

    /// Number of rows including tombstones.
    pub fn row_count(&self) -> AppResult<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| {
                row.get::<_, i64>(0).map(|v| v as usize)
            })
            .map_err(|e| AppError::Store(format!("Failed to count rows: {}", e)))
    }

    /// Fetch one row by rowid.
    pub fn get(&self, rowid: i64) -> AppResult<Option<Article>> {
        self.conn
            .query_row(
                "SELECT url, title, text, hostname, publish_date, crawl_date, lang, en_translation, en_summary
                 FROM articles WHERE rowid = ?1",
                params![rowid],
                |row| {
                    let crawl_date: String = row.get(5)?;
                    let crawl_date = DateTime::parse_from_rfc3339(&crawl_date)
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                        })?
                        .with_timezone(&Utc);

                    Ok(Article {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        text: row.get(2)?,
                        hostname: row.get(3)?,
                        publish_date: row.get(4)?,
                        crawl_date,
                        language: row.get(6)?,
                        translation: row.get(7)?,
                        summary: row.get(8)?,
                    })
                },
            )
            .optional()
            .map_err(|e| AppError::Store(format!("Failed to read row {}: {}", rowid, e)))
    }

    /// Full-text search with recency-weighted ranking.
    ///
    /// `query` is passed to FTS5 as-is, so whitespace-separated terms must all
    /// match. Results are ordered by `final_score` ascending with rowid as the
    /// tie-break and capped at `limit`.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        timebias_alpha: f64,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<SearchHit>> {
        ranker::validate_alpha(timebias_alpha)?;

        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!(query, limit, timebias_alpha, "SQL: {}", compact_sql(SEARCH_SQL));

        let mut stmt = self
            .conn
            .prepare(SEARCH_SQL)
            .map_err(|e| AppError::Store(format!("Failed to prepare search: {}", e)))?;

        let rows = stmt
            .query_map(
                params![timebias_alpha, query, format_timestamp(&now), limit as i64],
                |row| {
                    Ok(SearchHit {
                        rowid: row.get(0)?,
                        raw_rank: row.get(1)?,
                        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        url: row.get(3)?,
                        hostname: row.get(4)?,
                        publish_date: row.get(5)?,
                        language: row.get(6)?,
                        summary: row.get(7)?,
                        staleness_days: row.get(8)?,
                        time_bias: row.get(9)?,
                        final_score: row.get(10)?,
                    })
                },
            )
            .map_err(|e| search_error(query, e))?;

        let hits = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| search_error(query, e))?;

        debug_assert!(ranker::is_ranked(&hits));
        tracing::debug!("Search for {:?} returned {} hits", query, hits.len());

        Ok(hits)
    }
}

/// Map a search failure, separating bad FTS5 syntax from everything else.
fn search_error(query: &str, err: rusqlite::Error) -> AppError {
    let message = err.to_string();
    let syntax = ["fts5", "unterminated string", "no such column", "unknown special query"];
    if syntax.iter().any(|marker| message.contains(marker)) {
        AppError::QuerySyntax(format!("{:?}: {}", query, message))
    } else {
        AppError::Store(format!("Search failed: {}", message))
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert a published timestamp to RFC 3339 UTC when it parses.
///
/// Anything unrecognised is stored untouched; SQLite then reads it as NULL
/// and ranking falls back to the crawl date.
fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return format_timestamp(&ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return format_timestamp(&naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return format_timestamp(&midnight.and_utc());
        }
    }

    trimmed.to_string()
}

fn compact_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::NamedTempFile;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap()
    }

    fn article(url: &str, title: &str, text: &str, published: Option<&str>) -> Article {
        Article {
            url: url.to_string(),
            title: Some(title.to_string()),
            text: Some(text.to_string()),
            hostname: "news.test".to_string(),
            publish_date: published.map(str::to_string),
            crawl_date: now() - Duration::days(1),
            language: Some("en".to_string()),
            translation: None,
            summary: Some(format!("Summary of {}", title)),
        }
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = ArticleStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_on_disk_store() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let store = ArticleStore::open(temp_file.path()).unwrap();
            store
                .insert(&article("https://news.test/a", "Budget vote", "Senate budget vote", None))
                .unwrap();
        }

        let store = ArticleStore::open(temp_file.path()).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.contains_url("https://news.test/a").unwrap());
    }

    #[test]
    fn test_get_round_trips_row() {
        let store = ArticleStore::open_in_memory().unwrap();
        let mut row = article("https://news.test/g", "Wildfire", "wildfire near Madrid", Some("2024-09-06"));
        row.language = Some("es".to_string());
        row.translation = Some("wildfire near Madrid".to_string());
        let rowid = store.insert(&row).unwrap();

        let stored = store.get(rowid).unwrap().unwrap();
        assert_eq!(stored.url, row.url);
        assert_eq!(stored.translation, row.translation);
        assert_eq!(stored.publish_date.as_deref(), Some("2024-09-06T00:00:00Z"));
        assert_eq!(stored.crawl_date, row.crawl_date);
        assert!(store.get(rowid + 1).unwrap().is_none());
    }

    #[test]
    fn test_count_excludes_tombstones_but_contains_url_does_not() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .insert(&Article::tombstone("https://news.test/index", "news.test", now()))
            .unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.row_count().unwrap(), 1);
        assert!(store.contains_url("https://news.test/index").unwrap());
        assert!(!store.contains_url("https://news.test/other").unwrap());
    }

    #[test]
    fn test_search_excludes_null_text() {
        let store = ArticleStore::open_in_memory().unwrap();
        let mut dead = Article::tombstone("https://news.test/election", "news.test", now());
        dead.title = Some("election".to_string());
        store.insert(&dead).unwrap();
        store
            .insert(&article("https://news.test/live", "Election night", "election results", None))
            .unwrap();

        let hits = store.search("election", 10, 1.0, now()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://news.test/live");
    }

    #[test]
    fn test_search_orders_by_final_score() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .insert(&article(
                "https://news.test/old",
                "Harris rally",
                "Harris spoke at a rally about the economy",
                Some("2023-01-01T00:00:00Z"),
            ))
            .unwrap();
        store
            .insert(&article(
                "https://news.test/new",
                "Harris rally",
                "Harris spoke at a rally about the economy",
                Some("2024-09-09T09:00:00+02:00"),
            ))
            .unwrap();

        let hits = store.search("Harris rally", 10, 1.0, now()).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://news.test/new");
        assert!(ranker::is_ranked(&hits));

        for hit in &hits {
            assert!(hit.raw_rank < 0.0);
            assert!(hit.staleness_days >= 1.0);
            assert!(hit.time_bias > 0.0 && hit.time_bias <= 1.0);
            let expected = ranker::final_score(hit.raw_rank, hit.time_bias);
            assert!((hit.final_score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_staleness_uses_crawl_date_when_publish_missing() {
        let store = ArticleStore::open_in_memory().unwrap();
        let mut row = article("https://news.test/x", "Drought", "drought in spain", None);
        row.crawl_date = now() - Duration::days(10);
        store.insert(&row).unwrap();

        let mut garbled = article("https://news.test/y", "Drought", "drought in spain", Some("last tuesday"));
        garbled.crawl_date = now() - Duration::days(10);
        store.insert(&garbled).unwrap();

        let hits = store.search("drought", 10, 1.0, now()).unwrap();
        assert_eq!(hits.len(), 2);
        for hit in hits {
            assert!((hit.staleness_days - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_staleness_never_below_one_day() {
        let store = ArticleStore::open_in_memory().unwrap();
        let mut row = article("https://news.test/z", "Flood", "flood warning", None);
        row.crawl_date = now();
        store.insert(&row).unwrap();

        let hits = store.search("flood", 10, 1.0, now()).unwrap();
        assert_eq!(hits[0].staleness_days, 1.0);
        assert!((hits[0].time_bias - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_search_respects_limit_and_rowid_tiebreak() {
        let store = ArticleStore::open_in_memory().unwrap();
        for i in 0..5 {
            store
                .insert(&article(
                    &format!("https://news.test/{}", i),
                    "Tariffs",
                    "tariffs on steel",
                    Some("2024-09-01"),
                ))
                .unwrap();
        }

        let hits = store.search("tariffs", 3, 1.0, now()).unwrap();
        let rowids: Vec<i64> = hits.iter().map(|h| h.rowid).collect();
        assert_eq!(rowids, vec![1, 2, 3]);
    }

    #[test]
    fn test_malformed_query_is_syntax_error() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .insert(&article("https://news.test/a", "Title", "body text", None))
            .unwrap();

        let result = store.search("body AND", 10, 1.0, now());
        assert!(matches!(result, Err(AppError::QuerySyntax(_))));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let store = ArticleStore::open_in_memory().unwrap();
        assert!(store.search("   ", 10, 1.0, now()).unwrap().is_empty());
    }

    #[test]
    fn test_search_rejects_bad_alpha() {
        let store = ArticleStore::open_in_memory().unwrap();
        assert!(matches!(
            store.search("anything", 10, 0.0, now()),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(
            normalize_timestamp("2024-09-06T10:15:00+02:00"),
            "2024-09-06T08:15:00Z"
        );
        assert_eq!(normalize_timestamp("2024-09-06"), "2024-09-06T00:00:00Z");
        assert_eq!(
            normalize_timestamp("2024-09-06 07:30:00"),
            "2024-09-06T07:30:00Z"
        );
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }
}
