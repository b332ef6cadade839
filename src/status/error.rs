use thiserror::Error;

/// Errors raised while following a job's status
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("page URL has no `id` query parameter: {0}")]
    MissingJobId(String),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("status request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("status endpoint {url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unreadable status response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl StatusError {
    /// Whether the error came from talking to the endpoint, as opposed to bad input
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            StatusError::Transport { .. } | StatusError::HttpStatus { .. } | StatusError::Decode { .. }
        )
    }
}
