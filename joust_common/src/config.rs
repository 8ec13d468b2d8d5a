//! Configuration loading traits and types.
//!
//! Every joust binary reads one TOML file with a `[shared]` table plus its
//! own sections. Any `Deserialize` type gets [`ConfigLoader::load`].
//!
//! ```rust,no_run
//! use joust_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct KnightConfig {
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = KnightConfig::load(Path::new("joust.toml"))?;
//!     println!("Knight: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the given path.
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File exists but could not be read.
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log verbosity, lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Fields shared by every joust binary.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "dark-knight"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Robot instance identifier used in log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "joust-knight".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from TOML files.
///
/// - `ConfigError::FileNotFound` if the file does not exist
/// - `ConfigError::ReadError` on any other I/O failure
/// - `ConfigError::ParseError` if the TOML is malformed or mistyped
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e.to_string())
            }
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from an in-memory TOML string.
    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        shared: SharedConfig,
        #[serde(default)]
        rounds: u8,
    }

    #[test]
    fn log_level_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(LogLevel::default().as_filter(), "info");
    }

    #[test]
    fn log_level_lowercase_in_toml() {
        #[derive(Debug, Deserialize)]
        struct Level {
            level: LogLevel,
        }
        let parsed = Level::parse("level = \"warn\"").unwrap();
        assert_eq!(parsed.level, LogLevel::Warn);
        assert!(Level::parse("level = \"WARN\"").is_err());
    }

    #[test]
    fn empty_service_name_rejected() {
        let cfg = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "  ".to_string(),
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ValidationError(_))));
        assert!(SharedConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Wrapper::load(Path::new("/nonexistent/joust.toml")).unwrap_err();
        match err {
            ConfigError::FileNotFound(p) => assert!(p.ends_with("joust.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[shared\nservice_name = ").unwrap();
        assert!(matches!(
            Wrapper::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"rounds = 4

[shared]
log_level = "debug"
service_name = "red-knight"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let cfg = Wrapper::load(file.path()).unwrap();
        assert_eq!(cfg.shared.log_level, LogLevel::Debug);
        assert_eq!(cfg.shared.service_name, "red-knight");
        assert_eq!(cfg.rounds, 4);
    }

    #[test]
    fn log_level_defaults_when_omitted() {
        let cfg = Wrapper::parse("[shared]\nservice_name = \"k\"\n").unwrap();
        assert_eq!(cfg.shared.log_level, LogLevel::Info);
        assert_eq!(cfg.rounds, 0);
    }
}
