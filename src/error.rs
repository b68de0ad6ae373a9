/// Error types for configuration loading and poll ticks
use thiserror::Error;

/// Problems with the process configuration, reported once at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be one of {expected}, got '{value}'")]
    InvalidChoice {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("AMBIENT_API_URL '{0}' is not a usable base URL")]
    InvalidEndpoint(String),
}

/// Reasons a single poll tick was abandoned.
///
/// None of these are fatal: the tick is logged and skipped, and the next
/// scheduled tick starts from scratch.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request to weather service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather service returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),
}

impl PollError {
    /// True for network and HTTP-level failures, false for bad payloads.
    pub fn is_transport(&self) -> bool {
        matches!(self, PollError::Transport(_) | PollError::HttpStatus(_))
    }
}
