//! Error types for Heimdall.

use thiserror::Error;

/// Library-level error type for Heimdall operations.
#[derive(Error, Debug)]
pub enum HeimdallError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Completion API error: {0}")]
    Completion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Heimdall operations.
pub type Result<T> = std::result::Result<T, HeimdallError>;
