//! Test doubles for the model and the network.

use crate::ingest::PageFetcher;
use ragnews_core::{AppError, AppResult};
use ragnews_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

type Responder = Box<dyn Fn(&LlmRequest) -> AppResult<String> + Send + Sync>;

/// Model double that answers from a closure and records every request.
pub struct ScriptedClient {
    respond: Responder,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    pub fn new(respond: impl Fn(&LlmRequest) -> AppResult<String> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Routes on the system prompt the way the built-in news prompts are worded.
    pub fn news(keywords: &'static str, answer: &'static str) -> Self {
        Self::new(move |request| {
            let system = request.system.as_deref().unwrap_or("");
            if system.contains("Extract the most important 10 words") {
                Ok(keywords.to_string())
            } else if system.contains("professional translator") {
                Ok(format!("[en] {}", request.prompt))
            } else if system.contains("Summarize the input text") {
                Ok(format!("Summary: {}", first_words(&request.prompt, 12)))
            } else if system.contains("professional news commentator") {
                Ok(answer.to_string())
            } else {
                Err(AppError::Llm(format!("unexpected prompt: {:?}", system)))
            }
        })
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self::new(|_| Err(AppError::Llm("groq rate limit exceeded".to_string())))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose system prompt contains `marker`.
    pub fn requests_with(&self, marker: &str) -> Vec<LlmRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.system.as_deref().unwrap_or("").contains(marker))
            .collect()
    }
}

fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.respond)(request)?;
        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
        })
    }
}

/// Serves canned HTML by URL; anything else is a fetch failure.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &Url) -> AppResult<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| AppError::Fetch(format!("GET {} returned 404 Not Found", url)))
    }
}

pub const ELPAIS_URL: &str = "https://elpais.com/economia/2024-09-06/la-creacion-de-empleo-defrauda-en-estados-unidos-en-agosto-y-aviva-el-fantasma-de-la-recesion.html";

pub const ELPAIS_TITLE: &str =
    "La creación de empleo defrauda en Estados Unidos en agosto y aviva el temor a una recesión | Economía | EL PAÍS";

pub const ELPAIS_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <title>La creación de empleo defrauda en Estados Unidos en agosto y aviva el temor a una recesión | Economía | EL PAÍS</title>
  <meta property="og:type" content="article">
  <meta property="article:published_time" content="2024-09-06T14:53:00+02:00">
</head>
<body>
  <header><a href="/economia/">Economía</a></header>
  <article>
    <h1>La creación de empleo defrauda en Estados Unidos en agosto</h1>
    <p>La economía estadounidense creó 142.000 empleos en agosto, menos de lo previsto por los analistas.</p>
    <p>El dato aviva el temor a una recesión y refuerza las apuestas por un recorte de tipos de la Reserva Federal.</p>
    <p>La tasa de paro bajó ligeramente hasta el 4,2%, según la Oficina de Estadísticas Laborales.</p>
  </article>
  <a href="https://elpais.com/internacional/2024-09-06/harris-trump.html">Elecciones</a>
  <a href="https://www.cnn.com/2024/09/06/politics/">CNN</a>
</body>
</html>"#;

pub const CNN_URL: &str =
    "https://www.cnn.com/2024/09/06/politics/american-push-israel-hamas-deal-analysis/index.html";

pub const CNN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Analysis: The American push for an Israel-Hamas deal | CNN Politics</title>
  <script type="application/ld+json">{"@type": "NewsArticle", "datePublished": "2024-09-06T09:00:00Z"}</script>
</head>
<body>
  <div class="article__content">
    <p>The Biden administration is pressing Israel and Hamas to accept a ceasefire and hostage release deal.</p>
    <p>Officials say the negotiations have stalled over the Philadelphi corridor along the Gaza border.</p>
  </div>
  <a href="/2024/09/05/politics/harris-trump-debate/index.html">Debate</a>
</body>
</html>"#;

/// An English article of the given length on a fixed topic.
pub fn english_article(title: &str, sentence: &str) -> String {
    format!(
        r#"<html lang="en-US"><head><title>{title}</title><meta property="og:type" content="article"></head>
<body><article><p>{sentence}</p><p>{sentence}</p><p>{sentence}</p></article></body></html>"#
    )
}

pub const INDEX_HTML: &str = r#"<html lang="es"><head><title>EL PAÍS: el periódico global</title></head>
<body>
  <ul>
    <li><a href="https://elpais.com/economia/a1.html">Uno</a></li>
    <li><a href="https://elpais.com/economia/a2.html">Dos</a></li>
    <li><a href="https://elpais.com/economia/missing.html">Roto</a></li>
    <li><a href="https://www.cnn.com/world">CNN</a></li>
  </ul>
</body></html>"#;
