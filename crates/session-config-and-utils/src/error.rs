//! Errors raised while locating, reading and validating the config file.

use thiserror::Error;

/// Failure loading or validating the session tools' configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A config value is present but unusable, e.g. a zero request timeout
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing `config.json` failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `api_base_url` is not an absolute URL
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `config.json` is not valid JSON for `Config`
    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    /// The base directory cannot be resolved (no home directory)
    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
