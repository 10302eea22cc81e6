//! In-memory trackers for engine tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tpgh_core::{
    DestinationIssue, EntityType, ParentRef, ProvenanceMarker, SourceAttachment, SourceEntity,
};
use tpgh_github::{Board, BoardField, BoardItem, GitHubError};
use tpgh_migrate::ports::MigrateResult;
use tpgh_migrate::{
    BoardTracker, EntityNormalizer, IssueTracker, MarkdownConverter, MigrateError, SourceTracker,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps descriptions in a fixed prefix instead of converting HTML.
pub struct EchoConverter;

impl MarkdownConverter for EchoConverter {
    fn convert(&self, html: &str) -> String {
        format!("md:{html}")
    }
}

pub fn normalizer() -> EntityNormalizer {
    EntityNormalizer::new(Box::new(EchoConverter), "https://acme.tpondemand.com")
}

pub fn entity(entity_type: EntityType, id: u64, parent: Option<(EntityType, u64)>) -> SourceEntity {
    let entity = SourceEntity::new(entity_type, id, format!("{entity_type} {id}"));
    match parent {
        Some((parent_type, parent_id)) => entity.with_parent(ParentRef {
            entity_type: parent_type,
            id: parent_id,
        }),
        None => entity,
    }
}

// ── Source ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSource {
    /// Full snapshots, as single-entity fetches return them.
    pub entities: Vec<SourceEntity>,
    pub tasks: HashMap<u64, Vec<SourceEntity>>,
    pub emails: HashMap<(EntityType, u64), Vec<String>>,
    pub attachments: HashMap<(EntityType, u64), Vec<SourceAttachment>>,
    pub files: HashMap<u64, Vec<u8>>,
    pub downloads: Mutex<Vec<u64>>,
    pub entity_lookups: Mutex<Vec<(EntityType, u64)>>,
}

impl FakeSource {
    pub fn attach(&mut self, owner: (EntityType, u64), id: u64, name: &str, content: &[u8]) {
        self.attachments
            .entry(owner)
            .or_default()
            .push(SourceAttachment {
                id,
                owner_type: owner.0,
                owner_id: owner.1,
                original_filename: name.into(),
            });
        self.files.insert(id, content.to_vec());
    }

    pub fn downloads(&self) -> Vec<u64> {
        lock(&self.downloads).clone()
    }
}

fn not_found(path: String) -> MigrateError {
    MigrateError::Source(tpgh_source::SourceError::Api {
        status: 404,
        path,
        message: "not found".into(),
    })
}

#[async_trait]
impl SourceTracker for FakeSource {
    async fn team_entities(
        &self,
        entity_type: EntityType,
        _team_id: u64,
    ) -> MigrateResult<Vec<SourceEntity>> {
        // Collections carry neither parent references nor effort.
        Ok(self
            .entities
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .map(|e| {
                let mut listed = e.clone();
                listed.parent_ref = None;
                listed.effort = None;
                listed
            })
            .collect())
    }

    async fn entity(&self, entity_type: EntityType, id: u64) -> MigrateResult<SourceEntity> {
        lock(&self.entity_lookups).push((entity_type, id));
        self.entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.id == id)
            .cloned()
            .ok_or_else(|| not_found(format!("/api/v1/{}/{id}", entity_type.collection())))
    }

    async fn tasks(&self, story_id: u64, _team_id: u64) -> MigrateResult<Vec<SourceEntity>> {
        Ok(self.tasks.get(&story_id).cloned().unwrap_or_default())
    }

    async fn assigned_emails(&self, entity_type: EntityType, id: u64) -> MigrateResult<Vec<String>> {
        Ok(self.emails.get(&(entity_type, id)).cloned().unwrap_or_default())
    }

    async fn attachments(
        &self,
        entity_type: EntityType,
        id: u64,
    ) -> MigrateResult<Vec<SourceAttachment>> {
        Ok(self
            .attachments
            .get(&(entity_type, id))
            .cloned()
            .unwrap_or_default())
    }

    async fn download(&self, attachment_id: u64) -> MigrateResult<Vec<u8>> {
        lock(&self.downloads).push(attachment_id);
        self.files
            .get(&attachment_id)
            .cloned()
            .ok_or_else(|| not_found(format!("/attachment.aspx?attachmentId={attachment_id}")))
    }
}

// ── Issues ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content: Vec<u8>,
}

#[derive(Default)]
pub struct GitHubState {
    pub issues: Vec<DestinationIssue>,
    pub assignees: HashMap<u64, Vec<String>>,
    pub create_calls: usize,
    pub searches: usize,
    pub muted: Vec<u64>,
    /// `(parent number, child id)`
    pub links: Vec<(u64, u64)>,
    pub files: HashMap<String, Vec<u8>>,
    pub uploads: Vec<Upload>,
    pub default_branch_calls: usize,
    pub existence_checks: Vec<String>,
}

pub struct FakeGitHub {
    repo: String,
    default_branch: String,
    pub state: Mutex<GitHubState>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            repo: "acme/roadmap".into(),
            default_branch: "main".into(),
            state: Mutex::new(GitHubState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, GitHubState> {
        lock(&self.state)
    }

    /// Seed an existing issue, returning its number.
    pub fn seed_issue(&self, body: &str) -> u64 {
        let mut state = self.state();
        let number = state.issues.len() as u64 + 1;
        state.issues.push(issue(number, "seeded", body));
        number
    }

    pub fn issue_with_marker(&self, marker: &ProvenanceMarker) -> Option<DestinationIssue> {
        self.state()
            .issues
            .iter()
            .find(|i| marker.is_in(i.body()))
            .cloned()
    }
}

fn issue(number: u64, title: &str, body: &str) -> DestinationIssue {
    DestinationIssue {
        number,
        id: 1000 + number,
        node_id: format!("I_{number}"),
        title: title.into(),
        body: Some(body.into()),
        html_url: format!("https://github.com/acme/roadmap/issues/{number}"),
    }
}

#[async_trait]
impl IssueTracker for FakeGitHub {
    fn repo(&self) -> &str {
        &self.repo
    }

    /// Matches on the bare tag like GitHub's tokenized search, so
    /// `tp:Epic:12` also hits `tp:Epic:123`.
    async fn find_by_marker(
        &self,
        marker: &ProvenanceMarker,
    ) -> MigrateResult<Vec<DestinationIssue>> {
        let mut state = self.state();
        state.searches += 1;
        let tag = marker.tag();
        Ok(state
            .issues
            .iter()
            .filter(|i| i.body().contains(&tag))
            .cloned()
            .collect())
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignees: &[String],
    ) -> MigrateResult<DestinationIssue> {
        let mut state = self.state();
        state.create_calls += 1;
        let number = state.issues.len() as u64 + 1;
        let created = issue(number, title, body);
        state.issues.push(created.clone());
        state.assignees.insert(number, assignees.to_vec());
        Ok(created)
    }

    async fn mute(&self, issue_number: u64) -> MigrateResult<()> {
        self.state().muted.push(issue_number);
        Ok(())
    }

    async fn add_sub_issue(&self, parent_number: u64, child_id: u64) -> MigrateResult<bool> {
        let mut state = self.state();
        if state.links.iter().any(|(_, child)| *child == child_id) {
            return Ok(false);
        }
        state.links.push((parent_number, child_id));
        Ok(true)
    }

    async fn default_branch(&self) -> MigrateResult<String> {
        self.state().default_branch_calls += 1;
        Ok(self.default_branch.clone())
    }

    async fn file_exists(&self, path: &str, _branch: &str) -> MigrateResult<bool> {
        let mut state = self.state();
        state.existence_checks.push(path.to_string());
        Ok(state.files.contains_key(path))
    }

    async fn upload_file(
        &self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> MigrateResult<bool> {
        let mut state = self.state();
        if state.files.contains_key(path) {
            return Ok(false);
        }
        state.files.insert(path.to_string(), content.to_vec());
        state.uploads.push(Upload {
            path: path.into(),
            branch: branch.into(),
            message: message.into(),
            content: content.to_vec(),
        });
        Ok(true)
    }
}

// ── Board ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BoardState {
    pub items: Vec<BoardItem>,
    pub add_calls: usize,
    /// `(item id, field id, value)`
    pub values: Vec<(String, String, f64)>,
    pub node_lookups: Vec<u64>,
}

#[derive(Default)]
pub struct FakeBoard {
    pub boards: Vec<Board>,
    pub fields: Vec<BoardField>,
    pub state: Mutex<BoardState>,
}

impl FakeBoard {
    pub fn with_board(id: &str, title: &str) -> Self {
        Self {
            boards: vec![Board {
                id: id.into(),
                title: title.into(),
            }],
            fields: vec![
                BoardField {
                    id: "F_status".into(),
                    name: "Status".into(),
                    data_type: Some("SINGLE_SELECT".into()),
                },
                BoardField {
                    id: "F_estimate".into(),
                    name: "Estimate".into(),
                    data_type: Some("NUMBER".into()),
                },
            ],
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, BoardState> {
        lock(&self.state)
    }
}

#[async_trait]
impl BoardTracker for FakeBoard {
    async fn boards(&self, _org: &str) -> MigrateResult<Vec<Board>> {
        Ok(self.boards.clone())
    }

    async fn items(&self, _board_id: &str) -> MigrateResult<Vec<BoardItem>> {
        Ok(self.state().items.clone())
    }

    async fn fields(&self, _board_id: &str) -> MigrateResult<Vec<BoardField>> {
        Ok(self.fields.clone())
    }

    async fn add_item(&self, _board_id: &str, issue_node_id: &str) -> MigrateResult<String> {
        let mut state = self.state();
        state.add_calls += 1;
        let id = format!("PVTI_{}", state.items.len() + 1);
        state.items.push(BoardItem {
            id: id.clone(),
            content_id: Some(issue_node_id.into()),
        });
        Ok(id)
    }

    async fn set_number_field(
        &self,
        _board_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> MigrateResult<()> {
        self.state()
            .values
            .push((item_id.into(), field_id.into(), value));
        Ok(())
    }

    async fn issue_node_id(&self, _owner: &str, _repo: &str, number: u64) -> MigrateResult<String> {
        self.state().node_lookups.push(number);
        if number == 0 {
            return Err(GitHubError::NotFound(format!("issue #{number}")).into());
        }
        Ok(format!("I_{number}"))
    }
}
