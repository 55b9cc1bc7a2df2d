//! ragnews CLI
//!
//! Main entry point for the ragnews command-line tool.
//! Crawls news articles into a local store and answers questions from them.

mod commands;

use clap::{ArgGroup, Parser};
use commands::Session;
use ragnews_core::{
    config::{AppConfig, ConfigOverrides},
    logging, AppError, AppResult,
};
use ragnews_news::{ArticleStore, PromptRunner};
use std::path::PathBuf;

/// ragnews - answer questions about current events from crawled news
#[derive(Parser, Debug)]
#[command(name = "ragnews")]
#[command(about = "Retrieval-augmented question answering over crawled news", long_about = None)]
#[command(version)]
#[command(group(ArgGroup::new("mode").args(["add_url", "query", "cloze", "stats"])))]
struct Cli {
    /// Path to the article store
    #[arg(long)]
    db: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "RAGNEWS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "loglevel", env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (groq, openai, ollama)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Provider endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Add this URL to the store, then follow its links
    #[arg(long = "add_url")]
    add_url: Option<String>,

    /// How many link hops to follow from --add_url
    #[arg(long = "recursive_depth", default_value_t = 0, requires = "add_url")]
    recursive_depth: u32,

    /// Answer a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Fill the [MASKn] placeholders of a sentence
    #[arg(long)]
    cloze: Option<String>,

    /// Valid answers for --cloze, comma separated
    #[arg(long, value_delimiter = ',', requires = "cloze")]
    labels: Vec<String>,

    /// Print the number of stored articles
    #[arg(long)]
    stats: bool,

    /// Maximum number of articles handed to the model
    #[arg(long)]
    limit: Option<usize>,

    /// Recency sensitivity of the ranking (must be positive)
    #[arg(long = "timebias_alpha")]
    timebias_alpha: Option<f64>,

    /// Print query results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?
        .with_overrides(ConfigOverrides {
            db_path: cli.db.clone(),
            provider: cli.provider.clone(),
            model: cli.model.clone(),
            endpoint: cli.endpoint.clone(),
            limit: cli.limit,
            timebias_alpha: cli.timebias_alpha,
            log_level: cli.log_level.clone(),
            verbose: cli.verbose,
            no_color: cli.no_color,
        })
        .resolve_api_key();

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::info!("ragnews starting");
    tracing::debug!("Database: {:?}", config.db_path);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let client = ragnews_llm::create_client(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )
    .map_err(AppError::Config)?;

    let store = ArticleStore::open(&config.db_path)?;
    let runner = PromptRunner::new(client.as_ref(), &config.model)
        .with_prompts_dir(config.prompts_dir.as_deref());

    let session = Session {
        config: &config,
        store: &store,
        runner,
        json: cli.json,
    };

    let command_name = if cli.add_url.is_some() {
        "add_url"
    } else if cli.query.is_some() {
        "query"
    } else if cli.cloze.is_some() {
        "cloze"
    } else if cli.stats {
        "stats"
    } else {
        "interactive"
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = if let Some(url) = cli.add_url {
        commands::ingest::execute(&session, &url, cli.recursive_depth).await
    } else if let Some(question) = cli.query {
        commands::ask::execute(&session, &question).await
    } else if let Some(masked) = cli.cloze {
        commands::cloze::execute(&session, &masked, &cli.labels).await
    } else if cli.stats {
        commands::stats::execute(&session)
    } else {
        commands::ask::interactive(&session).await
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ingest_flags() {
        let cli = Cli::try_parse_from([
            "ragnews",
            "--add_url",
            "https://elpais.com/",
            "--recursive_depth",
            "2",
            "--db",
            "news.db",
        ])
        .unwrap();
        assert_eq!(cli.add_url.as_deref(), Some("https://elpais.com/"));
        assert_eq!(cli.recursive_depth, 2);
        assert_eq!(cli.db, Some(PathBuf::from("news.db")));
    }

    #[test]
    fn test_cloze_labels_split_on_commas() {
        let cli = Cli::try_parse_from([
            "ragnews",
            "--cloze",
            "[MASK0] is the democratic nominee",
            "--labels",
            "Harris,Trump",
        ])
        .unwrap();
        assert_eq!(cli.labels, vec!["Harris", "Trump"]);
    }

    #[test]
    fn test_modes_are_exclusive() {
        let result = Cli::try_parse_from(["ragnews", "--query", "Who?", "--stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_mode_is_interactive() {
        let cli = Cli::try_parse_from(["ragnews", "--timebias_alpha", "0.5"]).unwrap();
        assert!(cli.add_url.is_none() && cli.query.is_none() && cli.cloze.is_none());
        assert!(!cli.stats);
        assert_eq!(cli.timebias_alpha, Some(0.5));
    }
}
