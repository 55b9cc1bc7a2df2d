//! Logging infrastructure for ragnews.
//!
//! Initializes the tracing subscriber for structured logging. All logs go to
//! stderr so stdout stays clean for answers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "ragnews_news=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use ragnews_core::logging::init_logging;
///
/// init_logging(Some("warn"), false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = build_filter(log_level.unwrap_or(&default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Parse a level or filter directive list into an `EnvFilter`.
pub fn build_filter(level: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(normalize_level(level))
        .map_err(|e| AppError::Config(format!("Invalid log filter {:?}: {}", level, e)))
}

/// Accept the spelled-out level names people type on the command line.
///
/// `warning` and `critical` are not tracing levels; they map to `warn` and
/// `error`. Anything else passes through untouched.
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        _ => level.trim().to_string(),
    }
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
