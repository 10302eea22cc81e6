//! Run-level migration options.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationConfig {
    /// Path of the `email=username` assignee mapping file. Empty disables
    /// assignee mapping.
    #[serde(default)]
    pub assignee_map: String,

    /// Preview bodies and lookups without writing to GitHub.
    #[serde(default)]
    pub dry_run: bool,
}
