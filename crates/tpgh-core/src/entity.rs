//! Source-side entity snapshots and the TargetProcess hierarchy.
//!
//! ```text
//! Project → Epic → Feature → UserStory → Task
//! ```
//!
//! Every level except `Task` becomes its own GitHub issue. Tasks are rendered
//! as a checklist inside their user story's issue body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// A level in the TargetProcess work-item hierarchy.
///
/// Serialized with the TargetProcess resource names (`UserStory`, not
/// `user_story`) because those names end up inside provenance markers and
/// attachment paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Project,
    Epic,
    Feature,
    UserStory,
    Task,
}

impl EntityType {
    /// Levels that become destination issues, parents first.
    pub const ISSUE_LEVELS: [Self; 4] = [Self::Project, Self::Epic, Self::Feature, Self::UserStory];

    /// Resource name, as used in `where` filters and markers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Epic => "Epic",
            Self::Feature => "Feature",
            Self::UserStory => "UserStory",
            Self::Task => "Task",
        }
    }

    /// REST collection segment under `/api/v1/`.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Project => "Projects",
            Self::Epic => "Epics",
            Self::Feature => "Features",
            Self::UserStory => "UserStories",
            Self::Task => "Tasks",
        }
    }

    /// The level directly above this one, if any.
    #[must_use]
    pub const fn parent_type(self) -> Option<Self> {
        match self {
            Self::Project => None,
            Self::Epic => Some(Self::Project),
            Self::Feature => Some(Self::Epic),
            Self::UserStory => Some(Self::Feature),
            Self::Task => Some(Self::UserStory),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    /// Case-insensitive; `user_story`, `userstory` and `UserStory` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "project" => Ok(Self::Project),
            "epic" => Ok(Self::Epic),
            "feature" => Ok(Self::Feature),
            "userstory" => Ok(Self::UserStory),
            "task" => Ok(Self::Task),
            _ => Err(CoreError::UnknownEntityType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Typed reference to the parent of a [`SourceEntity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub entity_type: EntityType,
    pub id: u64,
}

/// Immutable snapshot of one TargetProcess work item, fetched once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub id: u64,
    pub entity_type: EntityType,
    pub name: String,
    /// Raw description HTML; empty when TP returned `null`.
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub parent_ref: Option<ParentRef>,
    /// TP `Effort`, only present on single-entity fetches.
    #[serde(default)]
    pub effort: Option<f64>,
}

impl SourceEntity {
    /// Minimal snapshot, as returned by collection fetches.
    #[must_use]
    pub fn new(entity_type: EntityType, id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            entity_type,
            name: name.into(),
            description_html: String::new(),
            parent_ref: None,
            effort: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, html: impl Into<String>) -> Self {
        self.description_html = html.into();
        self
    }

    #[must_use]
    pub const fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent_ref = Some(parent);
        self
    }
}

/// Attachment metadata. The bytes are fetched lazily by the source client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttachment {
    pub id: u64,
    pub owner_type: EntityType,
    pub owner_id: u64,
    pub original_filename: String,
}

impl SourceAttachment {
    /// Extension of the original file name including the leading dot, or an
    /// empty string (dotfiles such as `.env` have no extension).
    #[must_use]
    pub fn extension(&self) -> String {
        Path::new(&self.original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }
}
