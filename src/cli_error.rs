//! Error kinds at the CLI wrapper's boundary (§7), kept separate from the
//! core's `error` module: these touch the filesystem and argument parsing,
//! neither of which the core ever does.

use thiserror::Error;

use crate::error::ParseError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {location}: {source}")]
    Io { location: String, #[source] source: std::io::Error },

    #[error("{location} is not valid UTF-8")]
    NotUtf8 { location: String },

    #[error("could not parse {location} as YAML: {message}")]
    Yaml { location: String, message: String },

    #[error("could not parse {location} as JSON: {source}")]
    Json { location: String, #[source] source: serde_json::Error },

    #[error("could not parse {location} as TOML: {source}")]
    Toml { location: String, #[source] source: toml::de::Error },

    #[error("{location} did not match any known format (tried YAML, JSON, TOML)")]
    UnknownFormat { location: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    InvalidEnvValue { name: &'static str, value: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
