//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable that overrides the configured database path.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Configuration for the leaderboard HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Path to the SQLite database file (created if it doesn't exist).
    #[serde(default = "default_db_path")]
    db_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "sudoku_challenge.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file. Missing keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, db_path = %config.db_path, "Config loaded");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise starts from defaults, then
    /// applies `DATABASE_URL` if it is set.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        Ok(config.apply_env(std::env::var(DATABASE_URL_VAR).ok()))
    }

    /// Replaces the database path with `database_url` when present.
    #[instrument(skip(self))]
    pub fn apply_env(self, database_url: Option<String>) -> Self {
        match database_url {
            Some(url) if !url.trim().is_empty() => {
                info!(db_path = %url, "Database path taken from environment");
                self.with_db_path(url)
            }
            _ => self,
        }
    }

    /// Socket address string in `host:port` form.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ServerConfig::from_toml("port = 9000").expect("Parse failed");
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.db_path(), "sudoku_challenge.db");
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(ServerConfig::from_toml("port = \"not a number\"").is_err());
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "host = \"0.0.0.0\"\ndb_path = \"board.db\"").expect("Write failed");

        let config = ServerConfig::from_file(file.path()).expect("Load failed");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_path(), "board.db");
    }

    #[test]
    fn environment_overrides_db_path() {
        let config = ServerConfig::default().apply_env(Some("other.db".to_string()));
        assert_eq!(config.db_path(), "other.db");

        let unchanged = ServerConfig::default().apply_env(Some("  ".to_string()));
        assert_eq!(unchanged, ServerConfig::default());
    }
}
