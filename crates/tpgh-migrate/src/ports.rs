//! Ports for the two trackers and the HTML converter.
//!
//! The engine only talks to these traits. [`crate::adapters`] implements them
//! for the HTTP clients; tests implement them in memory.

use async_trait::async_trait;
use tpgh_core::{DestinationIssue, EntityType, ProvenanceMarker, SourceAttachment, SourceEntity};
use tpgh_github::{Board, BoardField, BoardItem};

use crate::error::MigrateError;

pub type MigrateResult<T> = Result<T, MigrateError>;

/// Read access to the source tracker.
#[async_trait]
pub trait SourceTracker: Send + Sync {
    /// Every not-done entity of one level owned by the team.
    async fn team_entities(
        &self,
        entity_type: EntityType,
        team_id: u64,
    ) -> MigrateResult<Vec<SourceEntity>>;

    /// One entity including its parent reference and effort.
    async fn entity(&self, entity_type: EntityType, id: u64) -> MigrateResult<SourceEntity>;

    /// Not-done tasks of a user story.
    async fn tasks(&self, story_id: u64, team_id: u64) -> MigrateResult<Vec<SourceEntity>>;

    async fn assigned_emails(&self, entity_type: EntityType, id: u64) -> MigrateResult<Vec<String>>;

    async fn attachments(
        &self,
        entity_type: EntityType,
        id: u64,
    ) -> MigrateResult<Vec<SourceAttachment>>;

    /// Attachment bytes, already inflated if the server gzipped them.
    async fn download(&self, attachment_id: u64) -> MigrateResult<Vec<u8>>;
}

/// Issue and repository-content access on the destination.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// `owner/name` of the destination repository.
    fn repo(&self) -> &str;

    /// Issues whose body contains the exact marker.
    async fn find_by_marker(&self, marker: &ProvenanceMarker)
    -> MigrateResult<Vec<DestinationIssue>>;

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignees: &[String],
    ) -> MigrateResult<DestinationIssue>;

    async fn mute(&self, issue_number: u64) -> MigrateResult<()>;

    /// `false` when the child is already linked.
    async fn add_sub_issue(&self, parent_number: u64, child_id: u64) -> MigrateResult<bool>;

    async fn default_branch(&self) -> MigrateResult<String>;

    /// Whether `path` already exists on `branch`.
    async fn file_exists(&self, path: &str, branch: &str) -> MigrateResult<bool>;

    /// `false` when a file already exists at `path`.
    async fn upload_file(
        &self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> MigrateResult<bool>;
}

/// Projects v2 access.
#[async_trait]
pub trait BoardTracker: Send + Sync {
    async fn boards(&self, org: &str) -> MigrateResult<Vec<Board>>;

    async fn items(&self, board_id: &str) -> MigrateResult<Vec<BoardItem>>;

    async fn fields(&self, board_id: &str) -> MigrateResult<Vec<BoardField>>;

    async fn add_item(&self, board_id: &str, issue_node_id: &str) -> MigrateResult<String>;

    async fn set_number_field(
        &self,
        board_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> MigrateResult<()>;

    async fn issue_node_id(&self, owner: &str, repo: &str, number: u64) -> MigrateResult<String>;
}

/// HTML to Markdown conversion strategy.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, html: &str) -> String;
}

/// Default converter backed by `html2md`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html2Md;

impl MarkdownConverter for Html2Md {
    fn convert(&self, html: &str) -> String {
        html2md::parse_html(html).trim().to_string()
    }
}
