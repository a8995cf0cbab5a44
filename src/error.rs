//! Error types for vidbridge.

use thiserror::Error;

/// Library-level error type for vidbridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} is not set. Export it with: export {0}='<your api key>'")]
    MissingCredential(String),

    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Upstream API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

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
}

/// Result type alias for vidbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
