//! Idempotent create-or-find of destination issues and sub-issue linking.

use tpgh_core::{DestinationIssue, ProvenanceMarker};

use crate::error::MigrateError;
use crate::normalizer::NormalizedIssue;
use crate::ports::IssueTracker;

/// How [`IssueRepository::upsert`] obtained its issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An issue with the marker already existed and was left untouched.
    Found,
    Created,
}

pub struct IssueRepository<'a> {
    tracker: &'a dyn IssueTracker,
}

impl<'a> IssueRepository<'a> {
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker) -> Self {
        Self { tracker }
    }

    /// The single issue carrying `marker`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::DuplicateMarker`] when several issues carry
    /// it; the marker must identify at most one issue.
    pub async fn find(
        &self,
        marker: &ProvenanceMarker,
    ) -> Result<Option<DestinationIssue>, MigrateError> {
        let mut matches = self.tracker.find_by_marker(marker).await?;
        // Adapters filter already; keep the exact-marker rule local too.
        matches.retain(|issue| marker.is_in(issue.body()));
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(MigrateError::DuplicateMarker {
                marker: marker.to_string(),
                numbers: matches.iter().map(|issue| issue.number).collect(),
            }),
        }
    }

    /// Return the issue for `marker`, creating and muting it when missing.
    ///
    /// Existing issues are never updated.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::DuplicateMarker`] on ambiguous search results
    /// and any tracker error from search, creation or muting.
    pub async fn upsert(
        &self,
        marker: &ProvenanceMarker,
        content: &NormalizedIssue,
        assignees: &[String],
    ) -> Result<(DestinationIssue, UpsertOutcome), MigrateError> {
        if let Some(existing) = self.find(marker).await? {
            tracing::info!(%marker, number = existing.number, "issue already exists");
            return Ok((existing, UpsertOutcome::Found));
        }

        let created = self
            .tracker
            .create_issue(&content.title, &content.body, assignees)
            .await?;
        self.tracker.mute(created.number).await?;
        tracing::info!(%marker, number = created.number, "created issue");
        Ok((created, UpsertOutcome::Created))
    }

    /// Link `child` under `parent`. `false` when it was already linked.
    ///
    /// # Errors
    ///
    /// Returns any tracker error other than an existing-link rejection.
    pub async fn link_child(
        &self,
        parent: &DestinationIssue,
        child: &DestinationIssue,
    ) -> Result<bool, MigrateError> {
        let linked = self.tracker.add_sub_issue(parent.number, child.id).await?;
        if linked {
            tracing::info!(parent = parent.number, child = child.number, "linked sub-issue");
        } else {
            tracing::debug!(parent = parent.number, child = child.number, "sub-issue already linked");
        }
        Ok(linked)
    }
}
