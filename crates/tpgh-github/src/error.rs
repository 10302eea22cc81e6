//! GitHub client error types.

use thiserror::Error;

/// Errors that can occur when talking to GitHub.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Missing or malformed client settings, raised before any request.
    #[error("GitHub configuration error: {0}")]
    Config(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub returned a non-success status code.
    #[error("GitHub {operation} failed (status={status}): {message}")]
    Api {
        /// What was being attempted (`create issue`, `add sub-issue`, ...).
        operation: &'static str,
        status: u16,
        /// Response body.
        message: String,
    },

    /// The GraphQL endpoint answered 200 with an `errors` array.
    #[error("GraphQL {operation} failed: {message}")]
    GraphQl {
        operation: &'static str,
        message: String,
    },

    /// A lookup target does not exist (organization, repository, issue).
    #[error("not found: {0}")]
    NotFound(String),

    /// A response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}
