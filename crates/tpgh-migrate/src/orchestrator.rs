//! Drives a full run: fetch, build the tree, then migrate it top-down.

use std::collections::HashMap;

use tpgh_core::{DestinationIssue, EntityType, ParentRef, ProvenanceMarker, SourceEntity};

use crate::assignees::AssigneeMapping;
use crate::attachments::AttachmentMigrator;
use crate::board::ProjectBoard;
use crate::error::MigrateError;
use crate::issues::{IssueRepository, UpsertOutcome};
use crate::normalizer::EntityNormalizer;
use crate::ports::{BoardTracker, IssueTracker, SourceTracker};
use crate::report::{EntityOutcome, MigratedEntity, MigrationReport};
use crate::tree::MigrationTree;

const DEFAULT_WEB_URL: &str = "https://github.com";

/// Per-run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub team_id: u64,
    /// Search only: nothing is created, uploaded, linked or put on a board.
    pub dry_run: bool,
}

/// Board that receives every migrated issue.
#[derive(Debug, Clone, Default)]
pub struct BoardTarget {
    pub org: String,
    pub name: String,
    /// Number field set from the entity effort. `None` skips estimates.
    pub estimate_field: Option<String>,
}

/// Board resolved once at the start of a run.
struct BoardSession<'b> {
    board: &'b ProjectBoard<'b>,
    board_id: String,
    estimate_field_id: Option<String>,
}

pub struct MigrationOrchestrator<'a> {
    source: &'a dyn SourceTracker,
    destination: &'a dyn IssueTracker,
    repository: IssueRepository<'a>,
    attachments: AttachmentMigrator<'a>,
    normalizer: EntityNormalizer,
    assignees: AssigneeMapping,
    board: Option<(ProjectBoard<'a>, BoardTarget)>,
}

impl<'a> MigrationOrchestrator<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn SourceTracker,
        destination: &'a dyn IssueTracker,
        normalizer: EntityNormalizer,
    ) -> Self {
        Self {
            source,
            destination,
            repository: IssueRepository::new(destination),
            attachments: AttachmentMigrator::new(source, destination, DEFAULT_WEB_URL, None),
            normalizer,
            assignees: AssigneeMapping::default(),
            board: None,
        }
    }

    #[must_use]
    pub fn with_assignees(mut self, assignees: AssigneeMapping) -> Self {
        self.assignees = assignees;
        self
    }

    /// Where attachment links point: `{web_url}/{repo}/blob/{branch}/...`.
    #[must_use]
    pub fn with_attachment_target(mut self, web_url: &str, branch: Option<&str>) -> Self {
        self.attachments = AttachmentMigrator::new(self.source, self.destination, web_url, branch);
        self
    }

    #[must_use]
    pub fn with_board(mut self, tracker: &'a dyn BoardTracker, target: BoardTarget) -> Self {
        self.board = Some((ProjectBoard::new(tracker, &target.org), target));
        self
    }

    /// Migrate every not-done project, epic, feature and user story of the
    /// team.
    ///
    /// # Errors
    ///
    /// Fetch and board-resolution failures are returned as is. Anything that
    /// fails while migrating an entity is wrapped in
    /// [`MigrateError::Entity`] naming it; the run stops there.
    pub async fn run(&self, options: RunOptions) -> Result<MigrationReport, MigrateError> {
        let tree = self.fetch_tree(options.team_id).await?;
        tracing::info!(entities = tree.len(), dry_run = options.dry_run, "fetched hierarchy");

        let session = match (&self.board, options.dry_run) {
            (Some((board, target)), false) => Some(Self::open_board(board, target).await?),
            _ => None,
        };

        let mut report = MigrationReport {
            dry_run: options.dry_run,
            ..MigrationReport::default()
        };
        let mut issues: HashMap<ParentRef, DestinationIssue> = HashMap::new();

        for entity in tree.iter() {
            self.migrate_entity(entity, options, session.as_ref(), &mut issues, &mut report)
                .await
                .map_err(|e| e.for_entity(entity.entity_type, entity.id))?;
        }

        tracing::info!(
            created = report.created,
            found = report.found,
            linked = report.linked,
            "migration finished"
        );
        Ok(report)
    }

    /// Fetch every issue level, then re-read non-project entities one by one
    /// for their parent reference and effort.
    async fn fetch_tree(&self, team_id: u64) -> Result<MigrationTree, MigrateError> {
        let mut tree = MigrationTree::new();
        for level in EntityType::ISSUE_LEVELS {
            let entities = self.source.team_entities(level, team_id).await?;
            tracing::debug!(%level, count = entities.len(), "fetched collection");
            for entity in entities {
                let entity = if level == EntityType::Project {
                    entity
                } else {
                    self.source.entity(level, entity.id).await?
                };
                tree.insert(entity);
            }
        }
        Ok(tree)
    }

    async fn open_board<'b>(
        board: &'b ProjectBoard<'b>,
        target: &BoardTarget,
    ) -> Result<BoardSession<'b>, MigrateError> {
        let board_id = board.resolve_board(&target.name).await?;
        let estimate_field_id = match target.estimate_field.as_deref() {
            Some(name) => Some(board.field_id(&board_id, name).await?),
            None => None,
        };
        Ok(BoardSession {
            board,
            board_id,
            estimate_field_id,
        })
    }

    async fn migrate_entity(
        &self,
        entity: &SourceEntity,
        options: RunOptions,
        board: Option<&BoardSession<'_>>,
        issues: &mut HashMap<ParentRef, DestinationIssue>,
        report: &mut MigrationReport,
    ) -> Result<(), MigrateError> {
        let tasks = if entity.entity_type == EntityType::UserStory {
            self.source.tasks(entity.id, options.team_id).await?
        } else {
            Vec::new()
        };
        let attachments = self
            .attachments
            .migrate(entity.entity_type, entity.id, options.dry_run)
            .await?;
        report.attachments += attachments.len();

        let emails = self
            .source
            .assigned_emails(entity.entity_type, entity.id)
            .await?;
        let assignees = self.assignees.resolve(&emails);
        let content = self.normalizer.normalize(entity, &tasks, &attachments);
        let marker = ProvenanceMarker::new(entity.entity_type, entity.id);

        if options.dry_run {
            let existing = self.repository.find(&marker).await?;
            let outcome = if existing.is_some() {
                EntityOutcome::Found
            } else {
                EntityOutcome::WouldCreate
            };
            tracing::info!(%marker, title = %content.title, ?outcome, "dry run");
            report.record(MigratedEntity {
                entity_type: entity.entity_type,
                id: entity.id,
                title: content.title,
                issue_number: existing.map(|issue| issue.number),
                outcome,
            });
            return Ok(());
        }

        let (issue, outcome) = self.repository.upsert(&marker, &content, &assignees).await?;
        report.record(MigratedEntity {
            entity_type: entity.entity_type,
            id: entity.id,
            title: content.title,
            issue_number: Some(issue.number),
            outcome: match outcome {
                UpsertOutcome::Created => EntityOutcome::Created,
                UpsertOutcome::Found => EntityOutcome::Found,
            },
        });

        if let Some(parent) = entity.parent_ref {
            match issues.get(&parent) {
                Some(parent_issue) => {
                    if self.repository.link_child(parent_issue, &issue).await? {
                        report.linked += 1;
                    } else {
                        report.already_linked += 1;
                    }
                }
                None => {
                    tracing::warn!(
                        %marker,
                        parent = %ProvenanceMarker::new(parent.entity_type, parent.id),
                        "parent not migrated in this run, skipping link"
                    );
                    report.skipped_links += 1;
                }
            }
        }

        if let Some(session) = board {
            self.place_on_board(session, entity, &issue).await?;
            report.board_items += 1;
        }

        issues.insert(
            ParentRef {
                entity_type: entity.entity_type,
                id: entity.id,
            },
            issue,
        );
        Ok(())
    }

    async fn place_on_board(
        &self,
        session: &BoardSession<'_>,
        entity: &SourceEntity,
        issue: &DestinationIssue,
    ) -> Result<(), MigrateError> {
        let node_id = if issue.node_id.is_empty() {
            let repo = self.destination.repo();
            let (owner, name) = repo.split_once('/').unwrap_or((repo, ""));
            session.board.issue_node_id(owner, name, issue.number).await?
        } else {
            issue.node_id.clone()
        };

        let item_id = session.board.add_issue(&session.board_id, &node_id).await?;
        if let (Some(field_id), Some(effort)) = (&session.estimate_field_id, entity.effort) {
            session
                .board
                .set_numeric_field(&session.board_id, &item_id, field_id, effort)
                .await?;
        }
        Ok(())
    }
}
