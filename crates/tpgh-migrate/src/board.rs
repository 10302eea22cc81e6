//! Projects v2 board resolution, item placement and estimates.

use tpgh_github::BoardField;

use crate::error::MigrateError;
use crate::ports::BoardTracker;

pub struct ProjectBoard<'a> {
    tracker: &'a dyn BoardTracker,
    org: String,
}

impl<'a> ProjectBoard<'a> {
    #[must_use]
    pub fn new(tracker: &'a dyn BoardTracker, org: &str) -> Self {
        Self {
            tracker,
            org: org.trim().to_string(),
        }
    }

    /// Id of the organization board titled exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::BoardNotFound`] or
    /// [`MigrateError::AmbiguousBoard`] unless exactly one board matches.
    pub async fn resolve_board(&self, name: &str) -> Result<String, MigrateError> {
        let mut matches: Vec<_> = self
            .tracker
            .boards(&self.org)
            .await?
            .into_iter()
            .filter(|board| board.title == name)
            .collect();
        match matches.len() {
            0 => Err(MigrateError::BoardNotFound {
                org: self.org.clone(),
                name: name.to_string(),
            }),
            1 => Ok(matches.remove(0).id),
            count => Err(MigrateError::AmbiguousBoard {
                org: self.org.clone(),
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Item id of the issue on the board, adding it when absent.
    ///
    /// # Errors
    ///
    /// Returns any tracker error.
    pub async fn add_issue(&self, board_id: &str, issue_node_id: &str) -> Result<String, MigrateError> {
        let items = self.tracker.items(board_id).await?;
        if let Some(item) = items
            .into_iter()
            .find(|item| item.content_id.as_deref() == Some(issue_node_id))
        {
            tracing::debug!(item = %item.id, "issue already on board");
            return Ok(item.id);
        }
        let item_id = self.tracker.add_item(board_id, issue_node_id).await?;
        tracing::info!(item = %item_id, "added issue to board");
        Ok(item_id)
    }

    /// Overwrite a number field on an item.
    ///
    /// # Errors
    ///
    /// Returns any tracker error.
    pub async fn set_numeric_field(
        &self,
        board_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), MigrateError> {
        self.tracker
            .set_number_field(board_id, item_id, field_id, value)
            .await
    }

    /// # Errors
    ///
    /// Returns any tracker error.
    pub async fn list_fields(&self, board_id: &str) -> Result<Vec<BoardField>, MigrateError> {
        self.tracker.fields(board_id).await
    }

    /// Id of the field named exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::FieldNotFound`] when no field has that name.
    pub async fn field_id(&self, board_id: &str, name: &str) -> Result<String, MigrateError> {
        self.list_fields(board_id)
            .await?
            .into_iter()
            .find(|field| field.name == name)
            .map(|field| field.id)
            .ok_or_else(|| MigrateError::FieldNotFound {
                board_id: board_id.to_string(),
                name: name.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns any tracker error, including a missing issue.
    pub async fn issue_node_id(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, MigrateError> {
        self.tracker.issue_node_id(owner, repo, number).await
    }
}
