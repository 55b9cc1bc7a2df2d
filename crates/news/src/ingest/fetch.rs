//! Page download.

use ragnews_core::{AppError, AppResult};
use url::{ParseError, Url};

/// Downloads the HTML of a page.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> AppResult<String>;
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ragnews/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> AppResult<String> {
        tracing::debug!(%url, "Downloading page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("GET {} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read body of {}: {}", url, e)))
    }
}

/// Parse a user- or page-supplied URL, assuming https when no scheme is given.
///
/// `host:port/path` parses as a scheme-only URL with no host, so it gets the
/// same treatment as a bare `host/path`.
pub fn normalize_url(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    let url = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => Ok(url),
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", trimmed))
        }
        other => other,
    }
    .map_err(|e| AppError::Fetch(format!("Invalid URL {:?}: {}", raw, e)))?;

    if url.host_str().is_none() {
        return Err(AppError::Fetch(format!("URL has no host: {:?}", raw)));
    }
    Ok(url)
}

/// Host plus explicit port, the way it appears in the URL.
pub fn hostname(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_https() {
        let url = normalize_url("elpais.com/economia/").unwrap();
        assert_eq!(url.as_str(), "https://elpais.com/economia/");
    }

    #[test]
    fn test_normalize_bare_url_with_url_in_query() {
        let url = normalize_url("elpais.com/r?to=https://cnn.com/x").unwrap();
        assert_eq!(url.as_str(), "https://elpais.com/r?to=https://cnn.com/x");
        assert_eq!(hostname(&url), "elpais.com");
    }

    #[test]
    fn test_normalize_bare_host_with_port() {
        let url = normalize_url("localhost:8080/a").unwrap();
        assert_eq!(url.as_str(), "https://localhost:8080/a");
        assert_eq!(hostname(&url), "localhost:8080");
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        let url = normalize_url("  http://localhost:8080/a  ").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/a");
        assert_eq!(hostname(&url), "localhost:8080");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(normalize_url("https://"), Err(AppError::Fetch(_))));
    }

    #[test]
    fn test_hostname_without_port() {
        let url = normalize_url("https://www.cnn.com/2024/09/06/politics/").unwrap();
        assert_eq!(hostname(&url), "www.cnn.com");
    }
}
