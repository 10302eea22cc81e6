//! Port implementations over the HTTP clients.

use async_trait::async_trait;
use tpgh_core::{DestinationIssue, EntityType, ProvenanceMarker, SourceAttachment, SourceEntity};
use tpgh_github::{Board, BoardField, BoardItem, GitHubClient, ProjectsClient};
use tpgh_source::TargetProcessClient;

use crate::ports::{BoardTracker, IssueTracker, MigrateResult, SourceTracker};

#[async_trait]
impl SourceTracker for TargetProcessClient {
    async fn team_entities(
        &self,
        entity_type: EntityType,
        team_id: u64,
    ) -> MigrateResult<Vec<SourceEntity>> {
        Ok(self.team_collection(entity_type, team_id).await?)
    }

    async fn entity(&self, entity_type: EntityType, id: u64) -> MigrateResult<SourceEntity> {
        Ok(Self::entity(self, entity_type, id).await?)
    }

    async fn tasks(&self, story_id: u64, team_id: u64) -> MigrateResult<Vec<SourceEntity>> {
        Ok(self.tasks_for_user_story(story_id, team_id).await?)
    }

    async fn assigned_emails(&self, entity_type: EntityType, id: u64) -> MigrateResult<Vec<String>> {
        Ok(Self::assigned_emails(self, entity_type, id).await?)
    }

    async fn attachments(
        &self,
        entity_type: EntityType,
        id: u64,
    ) -> MigrateResult<Vec<SourceAttachment>> {
        Ok(self.attachments_for(entity_type, id).await?)
    }

    async fn download(&self, attachment_id: u64) -> MigrateResult<Vec<u8>> {
        Ok(self.download_attachment(attachment_id).await?)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    fn repo(&self) -> &str {
        Self::repo(self)
    }

    async fn find_by_marker(
        &self,
        marker: &ProvenanceMarker,
    ) -> MigrateResult<Vec<DestinationIssue>> {
        Ok(self.find_issues_by_marker(marker).await?)
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignees: &[String],
    ) -> MigrateResult<DestinationIssue> {
        Ok(Self::create_issue(self, title, body, assignees).await?)
    }

    async fn mute(&self, issue_number: u64) -> MigrateResult<()> {
        Ok(self.mute_issue(issue_number).await?)
    }

    async fn add_sub_issue(&self, parent_number: u64, child_id: u64) -> MigrateResult<bool> {
        Ok(Self::add_sub_issue(self, parent_number, child_id).await?)
    }

    async fn default_branch(&self) -> MigrateResult<String> {
        Ok(Self::default_branch(self).await?)
    }

    async fn file_exists(&self, path: &str, branch: &str) -> MigrateResult<bool> {
        Ok(Self::file_exists(self, path, branch).await?)
    }

    async fn upload_file(
        &self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> MigrateResult<bool> {
        Ok(Self::upload_file(self, path, content, branch, message).await?)
    }
}

#[async_trait]
impl BoardTracker for ProjectsClient {
    async fn boards(&self, org: &str) -> MigrateResult<Vec<Board>> {
        Ok(Self::boards(self, org).await?)
    }

    async fn items(&self, board_id: &str) -> MigrateResult<Vec<BoardItem>> {
        Ok(Self::items(self, board_id).await?)
    }

    async fn fields(&self, board_id: &str) -> MigrateResult<Vec<BoardField>> {
        Ok(Self::fields(self, board_id).await?)
    }

    async fn add_item(&self, board_id: &str, issue_node_id: &str) -> MigrateResult<String> {
        Ok(Self::add_item(self, board_id, issue_node_id).await?)
    }

    async fn set_number_field(
        &self,
        board_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> MigrateResult<()> {
        Ok(Self::set_number_field(self, board_id, item_id, field_id, value).await?)
    }

    async fn issue_node_id(&self, owner: &str, repo: &str, number: u64) -> MigrateResult<String> {
        Ok(Self::issue_node_id(self, owner, repo, number).await?)
    }
}
