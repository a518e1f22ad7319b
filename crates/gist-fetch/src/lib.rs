//! Raw Gist retrieval over HTTP.
//!
//! - [`GistFetcher`]: the fetch seam used by the embedding pipeline
//! - [`HttpFetcher`]: single blocking GET per call, backed by a pooled [`ureq::Agent`]
//! - [`urls`]: builders for the raw, script and page URLs of a gist
//!
//! Failures are split into [`FetchError::Transport`] (retryable) and
//! [`FetchError::Status`] / [`FetchError::Empty`] (the gist is most likely
//! missing or deleted). No retry is attempted here.

mod http;
pub mod urls;

pub use http::{DEFAULT_TIMEOUT, HttpFetcher};

/// Gist fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// DNS, connection, TLS, timeout or body read failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// Server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// Server answered successfully but the body was empty.
    #[error("{url} returned an empty body")]
    Empty { url: String },
}

impl FetchError {
    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Short label for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Empty { .. } => "empty",
        }
    }
}

/// Source of raw Gist bodies.
pub trait GistFetcher: Send + Sync {
    /// Fetch the raw body of `gist_id`, or of one file within it.
    fn fetch(&self, gist_id: &str, filename: Option<&str>) -> Result<String, FetchError>;
}
