//! Migration error types.

use std::path::PathBuf;

use thiserror::Error;
use tpgh_core::EntityType;
use tpgh_github::GitHubError;
use tpgh_source::SourceError;

/// Errors raised by the migration engine.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// The assignee mapping file exists but could not be read.
    #[error("failed to read assignee mapping {}: {source}", path.display())]
    MappingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More than one issue carries the same provenance marker.
    #[error("marker {marker} found on multiple issues: {numbers:?}")]
    DuplicateMarker { marker: String, numbers: Vec<u64> },

    #[error("board {name:?} not found in organization {org}")]
    BoardNotFound { org: String, name: String },

    #[error("ambiguous board name {name:?} in organization {org} ({count} matches)")]
    AmbiguousBoard {
        org: String,
        name: String,
        count: usize,
    },

    #[error("field {name:?} not found on board {board_id}")]
    FieldNotFound { board_id: String, name: String },

    /// TargetProcess answered an attachment download with a JSON error
    /// document instead of file content.
    #[error("attachment {attachment_id} download returned an error payload: {status}: {message}")]
    DisguisedErrorPayload {
        attachment_id: u64,
        status: String,
        message: String,
    },

    /// Any failure while migrating one entity, tagged with that entity.
    #[error("failed to migrate {entity_type} #{id}: {source}")]
    Entity {
        entity_type: EntityType,
        id: u64,
        #[source]
        source: Box<MigrateError>,
    },
}

impl MigrateError {
    pub(crate) fn for_entity(self, entity_type: EntityType, id: u64) -> Self {
        Self::Entity {
            entity_type,
            id,
            source: Box::new(self),
        }
    }
}
