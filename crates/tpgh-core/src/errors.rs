//! Cross-cutting error types.
//!
//! Client- and engine-specific errors (`SourceError`, `GitHubError`,
//! `MigrateError`) live in their own crates. The binary converges them with
//! `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any tpgh crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known TargetProcess entity type.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A provenance marker could not be parsed.
    #[error("Invalid provenance marker: {0}")]
    InvalidMarker(String),
}
