//! Destination-side records.

use serde::{Deserialize, Serialize};

/// A GitHub issue as returned by the create and search endpoints.
///
/// GitHub identifies an issue three ways: `number` (per repository, used in
/// URLs), `id` (database id, required by the sub-issue API) and `node_id`
/// (GraphQL id, required by Projects v2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationIssue {
    pub number: u64,
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

impl DestinationIssue {
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// One attachment republished into the destination repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedAttachment {
    pub source_attachment_id: u64,
    pub original_name: String,
    pub destination_path: String,
    pub destination_url: String,
}
