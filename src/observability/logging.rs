//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Console output for operators, rotating file output for retention
//! - Log level from `RUST_LOG`, falling back to configuration
//!
//! # Design Decisions
//! - Request span fields (request id, source) appear on every line
//! - The file layer never emits ANSI colour codes

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::observability::rotation::RotatingFile;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file '{path}': {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log level '{level}': {source}")]
    Level {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("a global subscriber is already installed")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Default directives when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("wol_gateway={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let file = RotatingFile::open(&config.log_file, config.log_max_bytes, config.log_backups)
        .map_err(|source| LoggingError::LogFile {
            path: config.log_file.clone(),
            source,
        })?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.log_level)).map_err(|source| {
            LoggingError::Level {
                level: config.log_level.clone(),
                source,
            }
        })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_cover_crate_and_http_layer() {
        assert_eq!(default_directives("debug"), "wol_gateway=debug,tower_http=debug");
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = ObservabilityConfig {
            // A directory cannot be opened as a log file.
            log_file: dir.path().to_string_lossy().into_owned(),
            ..ObservabilityConfig::default()
        };
        assert!(matches!(init(&config), Err(LoggingError::LogFile { .. })));
    }
}
