//! Failures of the atmospheric fetch.
//!
//! Every variant means the same thing to the rest of the run: data is
//! unavailable and the run stops before computing anything.

/// Result type for forecast operations
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Error type for the fetch-and-average stage
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No valid samples for '{variable}' ({total} hourly slots, all missing)")]
    NoValidSamples { variable: String, total: usize },
}

impl From<reqwest::Error> for SamplerError {
    fn from(e: reqwest::Error) -> Self {
        SamplerError::Transport(e.to_string())
    }
}
