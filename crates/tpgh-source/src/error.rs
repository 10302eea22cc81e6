//! Source client error types.

use thiserror::Error;

/// Errors that can occur when talking to TargetProcess.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Missing or malformed client settings, raised before any request.
    #[error("TargetProcess configuration error: {0}")]
    Config(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TargetProcess returned a non-success status code.
    #[error("TargetProcess API error ({status}) for {path}: {message}")]
    Api {
        status: u16,
        /// Request path, without query string.
        path: String,
        /// Response body.
        message: String,
    },

    /// TargetProcess returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A gzip payload could not be inflated.
    #[error("failed to decompress attachment {attachment_id}: {source}")]
    Decompress {
        attachment_id: u64,
        #[source]
        source: std::io::Error,
    },
}
