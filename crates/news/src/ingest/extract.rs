//! HTML page to article metadata.

use crate::types::PageInfo;
use ragnews_core::{AppError, AppResult};
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

/// Turns a fetched page into a [`PageInfo`].
pub trait ArticleExtractor: Send + Sync {
    fn extract(&self, html: &str, page_url: &Url) -> AppResult<PageInfo>;
}

/// Extractor built on generic HTML and schema.org metadata.
///
/// A page counts as an article when it declares `og:type=article`, carries a
/// JSON-LD node whose `@type` ends in `Article`, or has an `<article>` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl ArticleExtractor for HtmlExtractor {
    fn extract(&self, html: &str, page_url: &Url) -> AppResult<PageInfo> {
        let document = Html::parse_document(html);
        let json_ld = json_ld_nodes(&document)?;

        let kind = if is_article(&document, &json_ld)? {
            "article"
        } else {
            "page"
        };

        let info = PageInfo {
            kind: kind.to_string(),
            title: first_text(&document, "title")?,
            text: body_text(&document)?,
            published: published(&document, &json_ld)?,
            language: language(&document)?,
            links: links(&document, page_url)?,
        };

        tracing::debug!(
            url = %page_url,
            kind = %info.kind,
            text_chars = info.text.chars().count(),
            links = info.links.len(),
            "Extracted page"
        );

        Ok(info)
    }
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::Fetch(format!("Invalid selector {}: {}", css, e)))
}

fn attr(document: &Html, css: &str, name: &str) -> AppResult<Option<String>> {
    Ok(document
        .select(&selector(css)?)
        .filter_map(|el| el.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string))
}

fn first_text(document: &Html, css: &str) -> AppResult<Option<String>> {
    Ok(document
        .select(&selector(css)?)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Every JSON-LD node on the page, with arrays and `@graph` flattened.
fn json_ld_nodes(document: &Html) -> AppResult<Vec<Value>> {
    let mut nodes = Vec::new();
    for script in document.select(&selector("script[type='application/ld+json']")?) {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => flatten_json_ld(value, &mut nodes),
            Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }
    Ok(nodes)
}

fn flatten_json_ld(value: Value, nodes: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items
            .into_iter()
            .for_each(|item| flatten_json_ld(item, nodes)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, nodes);
            }
            nodes.push(Value::Object(map));
        }
        _ => {}
    }
}

fn json_ld_types(node: &Value) -> Vec<&str> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn is_article(document: &Html, json_ld: &[Value]) -> AppResult<bool> {
    let og_article = attr(document, "meta[property='og:type']", "content")?
        .map(|t| t.eq_ignore_ascii_case("article"))
        .unwrap_or(false);

    let ld_article = json_ld
        .iter()
        .flat_map(json_ld_types)
        .any(|t| t.ends_with("Article"));

    let has_article_element = document.select(&selector("article")?).next().is_some();

    Ok(og_article || ld_article || has_article_element)
}

/// Paragraph text, preferring paragraphs inside `<article>`.
fn body_text(document: &Html) -> AppResult<String> {
    let mut paragraphs = paragraph_texts(document, "article p")?;
    if paragraphs.is_empty() {
        paragraphs = paragraph_texts(document, "p")?;
    }
    Ok(paragraphs.join("\n\n"))
}

fn paragraph_texts(document: &Html, css: &str) -> AppResult<Vec<String>> {
    Ok(document
        .select(&selector(css)?)
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect())
}

fn published(document: &Html, json_ld: &[Value]) -> AppResult<Option<String>> {
    if let Some(ts) = attr(document, "meta[property='article:published_time']", "content")? {
        return Ok(Some(ts));
    }

    let from_ld = json_ld
        .iter()
        .filter_map(|node| node.get("datePublished").and_then(Value::as_str))
        .map(str::trim)
        .find(|ts| !ts.is_empty());
    if let Some(ts) = from_ld {
        return Ok(Some(ts.to_string()));
    }

    attr(document, "time[datetime]", "datetime")
}

fn language(document: &Html) -> AppResult<Option<String>> {
    if let Some(lang) = attr(document, "html[lang]", "lang")? {
        return Ok(Some(lang));
    }
    if let Some(locale) = attr(document, "meta[property='og:locale']", "content")? {
        return Ok(Some(locale.replace('_', "-")));
    }
    attr(document, "meta[http-equiv='content-language']", "content")
}

/// Absolute http(s) links without fragments, first occurrence wins.
fn links(document: &Html, page_url: &Url) -> AppResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for anchor in document.select(&selector("a[href]")?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = page_url.join(href.trim()) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);

        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            out.push(link);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://elpais.com/economia/2024-09-06/empleo.html").unwrap()
    }

    const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es-ES">
<head>
  <title>La creaci&oacute;n de empleo defrauda | Econom&iacute;a | EL PA&Iacute;S</title>
  <meta property="og:type" content="article">
  <meta property="article:published_time" content="2024-09-06T14:32:00+02:00">
</head>
<body>
  <nav><p>Suscríbete</p></nav>
  <article>
    <p>La economía de Estados Unidos creó 142.000 empleos en agosto.</p>
    <p>El dato   aviva el temor a una recesión.</p>
  </article>
  <a href="/economia/otra.html#comentarios">Otra</a>
  <a href="https://elpais.com/economia/otra.html">Otra otra vez</a>
  <a href="mailto:redaccion@elpais.es">Contacto</a>
  <a href="https://cnn.com/world">CNN</a>
</body>
</html>"#;

    #[test]
    fn test_extract_article_fields() {
        let info = HtmlExtractor.extract(ARTICLE_HTML, &page_url()).unwrap();

        assert!(info.is_article());
        assert_eq!(
            info.title.as_deref(),
            Some("La creación de empleo defrauda | Economía | EL PAÍS")
        );
        assert_eq!(info.language.as_deref(), Some("es-ES"));
        assert_eq!(info.published.as_deref(), Some("2024-09-06T14:32:00+02:00"));
        assert_eq!(
            info.text,
            "La economía de Estados Unidos creó 142.000 empleos en agosto.\n\nEl dato aviva el temor a una recesión."
        );
    }

    #[test]
    fn test_links_are_absolute_and_deduplicated() {
        let info = HtmlExtractor.extract(ARTICLE_HTML, &page_url()).unwrap();
        assert_eq!(
            info.links,
            vec![
                "https://elpais.com/economia/otra.html".to_string(),
                "https://cnn.com/world".to_string(),
            ]
        );
    }

    #[test]
    fn test_json_ld_article_and_date() {
        let html = r#"<html><head>
            <title>Debate recap</title>
            <meta property="og:locale" content="en_US">
            <script type="application/ld+json">
              {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage"},
                {"@type": ["NewsArticle"], "datePublished": "2024-09-10T21:00:00Z"}
              ]}
            </script>
            </head><body><p>Both candidates met in Philadelphia.</p></body></html>"#;

        let info = HtmlExtractor.extract(html, &page_url()).unwrap();
        assert!(info.is_article());
        assert_eq!(info.published.as_deref(), Some("2024-09-10T21:00:00Z"));
        assert_eq!(info.language.as_deref(), Some("en-US"));
        assert_eq!(info.text, "Both candidates met in Philadelphia.");
    }

    #[test]
    fn test_index_page_is_not_article() {
        let html = r#"<html><head><title>Portada</title></head>
            <body><ul><li><a href="/a.html">A</a></li></ul></body></html>"#;

        let info = HtmlExtractor.extract(html, &page_url()).unwrap();
        assert!(!info.is_article());
        assert_eq!(info.kind, "page");
        assert!(info.text.is_empty());
        assert_eq!(info.links, vec!["https://elpais.com/a.html".to_string()]);
    }

    #[test]
    fn test_time_element_fallback() {
        let html = r#"<html><body><article>
            <time datetime="2024-08-30">Aug 30</time><p>Text</p>
            </article></body></html>"#;

        let info = HtmlExtractor.extract(html, &page_url()).unwrap();
        assert_eq!(info.published.as_deref(), Some("2024-08-30"));
        assert!(info.language.is_none());
    }
}
