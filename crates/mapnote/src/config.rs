//! Configuration for the mapnote CLI.
//!
//! Configuration is loaded from multiple sources and merged, later sources
//! overriding earlier ones field by field:
//! 1. Global config: `~/.config/mapnote/config.json`
//! 2. Environment variable: `MAPNOTE_CONFIG_CONTENT`
//! 3. Store config: `mapnote.jsonc` or `mapnote.json` in the store directory
//!
//! All files are JSONC: `//` and `/* */` comments are stripped before parsing.

use mapnote_history::StoreConfig;
use mapnote_util::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding inline configuration.
pub const CONFIG_ENV: &str = "MAPNOTE_CONFIG_CONTENT";

const GLOBAL_FILES: &[&str] = &["config.json", "mapnote.json", "mapnote.jsonc"];
const STORE_FILES: &[&str] = &["mapnote.jsonc", "mapnote.json"];

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in config {source_name}: {message}")]
    InvalidJson {
        source_name: String,
        message: String,
    },

    #[error("Invalid log level in config: {0}")]
    InvalidLogLevel(String),
}

/// CLI configuration. Every field is optional; unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log level when `RUST_LOG` is not set: trace, debug, info, warn, error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Print logs to stderr even without `--verbose`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_print: Option<bool>,

    /// Indent the saved database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Sync the database file on every save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsync: Option<bool>,
}

impl Config {
    /// Load configuration from all sources for the store in `store_dir`.
    ///
    /// Returns the merged configuration and the files it came from.
    pub fn load(store_dir: &Path) -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let global_dir = mapnote_util::path::config_dir();
        let inline = std::env::var(CONFIG_ENV).ok();
        Self::load_from(global_dir.as_deref(), inline.as_deref(), store_dir)
    }

    fn load_from(
        global_dir: Option<&Path>,
        inline: Option<&str>,
        store_dir: &Path,
    ) -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        if let Some(dir) = global_dir {
            if let Some(path) = first_existing(dir, GLOBAL_FILES) {
                config = config.merge(Self::load_file(&path)?);
                sources.push(path);
            }
        }

        if let Some(content) = inline {
            config = config.merge(Self::parse_jsonc(content, "<env>")?);
        }

        if let Some(path) = first_existing(store_dir, STORE_FILES) {
            config = config.merge(Self::load_file(&path)?);
            sources.push(path);
        }

        Ok((config, sources))
    }

    /// Load configuration from a file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> Result<Self, ConfigError> {
        let stripped = strip_comments(content);
        serde_json::from_str(&stripped).map_err(|e| ConfigError::InvalidJson {
            source_name: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(self, other: Self) -> Self {
        Self {
            log_level: other.log_level.or(self.log_level),
            log_print: other.log_print.or(self.log_print),
            pretty: other.pretty.or(self.pretty),
            fsync: other.fsync.or(self.fsync),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            pretty: self.pretty.unwrap_or(defaults.pretty),
            fsync: self.fsync.unwrap_or(defaults.fsync),
        }
    }

    /// Logging setup; `verbose` forces printing at debug level or finer.
    pub fn log_config(&self, verbose: bool) -> Result<LogConfig, ConfigError> {
        let level = match &self.log_level {
            Some(name) => {
                LogLevel::parse(name).ok_or_else(|| ConfigError::InvalidLogLevel(name.clone()))?
            }
            None => LogLevel::Warn,
        };
        let level = if verbose && level != LogLevel::Trace {
            LogLevel::Debug
        } else {
            level
        };
        Ok(LogConfig {
            print: verbose || self.log_print.unwrap_or(false),
            level,
            include_location: false,
        })
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|p| p.is_file())
}

/// Strip `//` and `/* */` comments outside of strings.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            result.push(c);
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    // Keep line numbers in parse errors accurate.
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn strip_comments_keeps_strings() {
        let input = r#"{
            // line comment
            "log_level": "debug", /* block
            comment */ "pretty": false,
            "note": "not // a comment"
        }"#;
        let stripped = strip_comments(input);
        assert!(!stripped.contains("line comment"));
        assert!(!stripped.contains("block"));
        assert!(stripped.contains("not // a comment"));
    }

    #[test]
    fn parse_jsonc_reads_fields() {
        let config = Config::parse_jsonc(
            r#"{ /* quiet saves */ "pretty": false, "fsync": false }"#,
            "test",
        )
        .unwrap();
        assert_eq!(config.pretty, Some(false));
        assert_eq!(config.fsync, Some(false));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn parse_jsonc_rejects_unknown_fields() {
        let err = Config::parse_jsonc(r#"{"colour": "red"}"#, "test").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson { .. }));
    }

    #[test]
    fn merge_prefers_other() {
        let base = Config {
            log_level: Some("info".into()),
            pretty: Some(true),
            ..Default::default()
        };
        let other = Config {
            pretty: Some(false),
            fsync: Some(false),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.log_level.as_deref(), Some("info"));
        assert_eq!(merged.pretty, Some(false));
        assert_eq!(merged.fsync, Some(false));
    }

    #[test]
    fn load_merges_sources_in_order() {
        let global = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        std::fs::write(
            global.path().join("config.json"),
            r#"{"log_level": "info", "pretty": false, "fsync": false}"#,
        )
        .unwrap();
        std::fs::write(
            store.path().join("mapnote.jsonc"),
            "{\n  // store wins\n  \"pretty\": true\n}",
        )
        .unwrap();

        let (config, sources) = Config::load_from(
            Some(global.path()),
            Some(r#"{"log_level": "error"}"#),
            store.path(),
        )
        .unwrap();

        assert_eq!(config.log_level.as_deref(), Some("error"));
        assert_eq!(config.pretty, Some(true));
        assert_eq!(config.fsync, Some(false));
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn load_without_sources_is_default() {
        let store = TempDir::new().unwrap();
        let (config, sources) = Config::load_from(None, None, store.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(sources.is_empty());
    }

    #[test]
    fn store_and_log_config_defaults() {
        let config = Config::default();
        let store = config.store_config();
        assert!(store.pretty);
        assert!(store.fsync);

        let log = config.log_config(false).unwrap();
        assert!(!log.print);
        assert_eq!(log.level, LogLevel::Warn);

        let log = config.log_config(true).unwrap();
        assert!(log.print);
        assert_eq!(log.level, LogLevel::Debug);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let config = Config {
            log_level: Some("loud".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.log_config(false),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
