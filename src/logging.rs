//! Structured logging initialisation
//!
//! Logs go to stderr so stdout stays clean for command output (e.g.
//! `turbo-drf validate` printing the resolved options).
//!
//! Environment variables:
//! - `TURBO_DRF_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//! - `TURBO_DRF_LOG_FORMAT`: pretty, json, compact (default: compact)
//! - `TURBO_DRF_LOG_LOCATION`: include file/line in records (default: false)
//! - `RUST_LOG`: full `EnvFilter` directives, takes precedence over the level

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per record
    Json,
    /// Multi-line human readable records
    Pretty,
    /// Single-line human readable records
    Compact,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is compact
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level when `RUST_LOG` is not set
    pub log_level: String,
    /// Output format
    pub format: LogFormat,
    /// Include file and line number in records
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: LogFormat::Compact,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("TURBO_DRF_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("TURBO_DRF_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            include_location: env::var("TURBO_DRF_LOG_LOCATION")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(defaults.include_location),
        }
    }

    /// Raise the level by `verbosity` steps (`-v` = info, `-vv` = debug, `-vvv` = trace)
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        if verbosity > 0 {
            self.log_level = match verbosity {
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
            .to_string();
        }
        self
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Compact);
    }

    #[test]
    fn test_verbosity_raises_level() {
        let config = LogConfig::default();
        assert_eq!(config.level(), Level::WARN);
        assert_eq!(config.clone().with_verbosity(1).level(), Level::INFO);
        assert_eq!(config.clone().with_verbosity(2).level(), Level::DEBUG);
        assert_eq!(config.with_verbosity(5).level(), Level::TRACE);
    }

    #[test]
    fn test_zero_verbosity_keeps_configured_level() {
        let config = LogConfig {
            log_level: "error".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.with_verbosity(0).level(), Level::ERROR);
    }
}
