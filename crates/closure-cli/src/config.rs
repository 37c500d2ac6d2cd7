//! Optional TOML configuration.
//!
//! ```toml
//! [check]
//! allow_pivot = false
//!
//! [compare]
//! message = false
//!
//! [log]
//! filter = "warn"
//! ```
//!
//! Flags given on the command line take precedence.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "closure.toml";
pub const LOG_ENV: &str = "CLOSURE_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClosureConfig {
    pub check: CheckConfig,
    pub compare: CompareConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub allow_pivot: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    pub message: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Load `explicit` if given, else `closure.toml` if it exists, else defaults.
pub fn load(explicit: Option<&str>) -> Result<ClosureConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).is_file() => DEFAULT_CONFIG_PATH,
        None => return Ok(ClosureConfig::default()),
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_string(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &str) -> Result<ClosureConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::ParseToml {
        path: path.to_string(),
        source,
    })
}
