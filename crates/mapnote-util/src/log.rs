//! Logging setup using tracing.
//!
//! Library crates only emit `tracing` events; the binary decides where they go.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Filter directive scoping this level to the mapnote crates.
    pub fn directive(&self) -> String {
        let level = self.as_str();
        format!(
            "mapnote={level},mapnote_history={level},mapnote_storage={level},mapnote_model={level}"
        )
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Whether to print logs to stderr.
    pub print: bool,
    /// Log level, used when `RUST_LOG` is not set.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
}

/// Initialize logging with the given configuration.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case when several tests in one process call this.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.directive()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.print {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        subscriber.with(fmt_layer).try_init().is_ok()
    } else {
        // Nothing is printed, but spans still work.
        subscriber.try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_directive_covers_store_crates() {
        let directive = LogLevel::Warn.directive();
        assert!(directive.contains("mapnote=warn"));
        assert!(directive.contains("mapnote_history=warn"));
        assert!(directive.contains("mapnote_storage=warn"));
    }

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert!(!config.print);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LogConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
