//! Error types for the onsei-dl library.

use thiserror::Error;

/// Errors that can occur during catalog or download operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error (transport, non-2xx status, body read).
    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response body could not be decoded.
    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file could not be parsed.
    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Login did not produce a usable token.
    #[error("login failed: {0}")]
    Auth(String),

    /// Configuration error (missing value, unwritable config dir).
    #[error("configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for onsei-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
