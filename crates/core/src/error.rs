//! Error types for ragnews.
//!
//! One enum covers every failure category: ingestion (fetch), search (query
//! syntax, empty retrieval, store), language-model calls, parameter validation,
//! and the ambient configuration/I/O/prompt errors.

use thiserror::Error;

/// Unified error type for ragnews.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network or parse failure while ingesting a URL
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed full-text query string
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// Retrieval produced no articles for a synthesis request
    #[error("No articles retrieved for {0:?}")]
    EmptyRetrieval(String),

    /// Language-model transport, authentication, or rate-limit failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// A parameter was rejected before any I/O was attempted
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Article store failures other than query syntax
    #[error("Store error: {0}")]
    Store(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_retrieval_message_quotes_input() {
        let err = AppError::EmptyRetrieval("economia recesion".to_string());
        assert_eq!(
            err.to_string(),
            "No articles retrieved for \"economia recesion\""
        );
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
