//! Configuration management for ragnews.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - A YAML config file (`ragnews.yaml` in the working directory, or `RAGNEWS_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! The API key is resolved once, after all layers are applied, and the
//! resulting `AppConfig` is passed by reference for the rest of the process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the model factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["groq", "openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite article store
    pub db_path: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("groq", "openai", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (provider default when unset)
    pub api_key_env: Option<String>,

    /// API key, resolved once at startup
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Directory with prompt overrides (`<id>.yml`)
    pub prompts_dir: Option<PathBuf>,

    /// Retrieval tuning
    pub retrieval: RetrievalConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Retrieval parameters used by the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of articles handed to the synthesizer
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Recency sensitivity; smaller values favor recent articles more sharply
    #[serde(rename = "timebiasAlpha", default = "default_timebias_alpha")]
    pub timebias_alpha: f64,
}

fn default_limit() -> usize {
    10
}

fn default_timebias_alpha() -> f64 {
    1.0
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            timebias_alpha: default_timebias_alpha(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalConfig>,
    prompts: Option<PromptsSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptsSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

/// Command-line values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub limit: Option<usize>,
    pub timebias_alpha: Option<f64>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("ragnews.db"),
            config_file: None,
            provider: "groq".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            endpoint: None,
            api_key_env: None,
            api_key: None,
            prompts_dir: None,
            retrieval: RetrievalConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the environment.
    ///
    /// `config_file` is the path given on the command line; it wins over
    /// `RAGNEWS_CONFIG`. An explicitly named file must exist, while the
    /// default `ragnews.yaml` is optional.
    ///
    /// Environment variables:
    /// - `RAGNEWS_CONFIG`: Path to config file
    /// - `RAGNEWS_DB`: Article store path
    /// - `RAGNEWS_PROVIDER`: LLM provider
    /// - `RAGNEWS_MODEL`: Model identifier
    /// - `RAGNEWS_ENDPOINT`: Provider endpoint
    /// - `NO_COLOR`: Disable colored output
    ///
    /// The API key is not read here; call [`AppConfig::resolve_api_key`] once
    /// the provider is final.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("RAGNEWS_CONFIG").ok().map(PathBuf::from));

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("ragnews.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        if let Ok(db) = std::env::var("RAGNEWS_DB") {
            config.db_path = PathBuf::from(db);
        }

        if let Ok(provider) = std::env::var("RAGNEWS_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("RAGNEWS_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("RAGNEWS_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(db) = config_file.database {
            if let Some(path) = db.path {
                result.db_path = PathBuf::from(path);
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if llm.api_key_env.is_some() {
                result.api_key_env = llm.api_key_env;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(prompts) = config_file.prompts {
            if let Some(dir) = prompts.dir {
                result.prompts_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(db_path) = overrides.db_path {
            self.db_path = db_path;
        }

        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(limit) = overrides.limit {
            self.retrieval.limit = limit;
        }

        if let Some(alpha) = overrides.timebias_alpha {
            self.retrieval.timebias_alpha = alpha;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Name of the environment variable the API key is read from.
    ///
    /// An explicit `apiKeyEnv` wins; otherwise the provider's conventional
    /// variable is used. Ollama needs no key.
    pub fn api_key_var(&self) -> Option<String> {
        if let Some(ref var) = self.api_key_env {
            return Some(var.clone());
        }

        match self.provider.to_lowercase().as_str() {
            "groq" => Some("GROQ_API_KEY".to_string()),
            "openai" => Some("OPENAI_API_KEY".to_string()),
            _ => None,
        }
    }

    /// Read the API key from the environment, once.
    ///
    /// `RAGNEWS_API_KEY` takes precedence over the provider variable. A missing
    /// key is not an error here: the model client reports it as an
    /// authentication failure on its first call.
    pub fn resolve_api_key(mut self) -> Self {
        self.api_key = std::env::var("RAGNEWS_API_KEY")
            .ok()
            .or_else(|| self.api_key_var().and_then(|var| std::env::var(var).ok()))
            .filter(|key| !key.trim().is_empty());

        if self.api_key.is_none() && self.api_key_var().is_some() {
            tracing::warn!(
                provider = %self.provider,
                "No API key found in the environment; model calls will fail to authenticate"
            );
        }

        self
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model cannot be empty".to_string()));
        }

        if self.retrieval.limit == 0 {
            return Err(AppError::InvalidParameter(
                "retrieval.limit must be at least 1".to_string(),
            ));
        }

        if !(self.retrieval.timebias_alpha.is_finite() && self.retrieval.timebias_alpha > 0.0) {
            return Err(AppError::InvalidParameter(format!(
                "retrieval.timebiasAlpha must be a positive number, got {}",
                self.retrieval.timebias_alpha
            )));
        }

        Ok(())
    }
}
