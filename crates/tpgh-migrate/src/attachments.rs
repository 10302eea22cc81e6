//! Republishes TargetProcess attachments into the destination repository.
//!
//! Files land at `tp_attachments/{type}/{owner_id}/{attachment_id}{ext}`, so
//! re-runs address the same path and never overwrite it.

use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tpgh_core::{EntityType, MigratedAttachment, SourceAttachment};

use crate::error::MigrateError;
use crate::ports::{IssueTracker, SourceTracker};

/// Root directory of migrated attachments in the destination repository.
pub const ATTACHMENT_ROOT: &str = "tp_attachments";

pub struct AttachmentMigrator<'a> {
    source: &'a dyn SourceTracker,
    destination: &'a dyn IssueTracker,
    web_url: String,
    configured_branch: Option<String>,
    branch: OnceCell<String>,
}

impl<'a> AttachmentMigrator<'a> {
    /// `branch` of `None` (or blank) means the repository default branch,
    /// looked up on first use.
    #[must_use]
    pub fn new(
        source: &'a dyn SourceTracker,
        destination: &'a dyn IssueTracker,
        web_url: &str,
        branch: Option<&str>,
    ) -> Self {
        Self {
            source,
            destination,
            web_url: web_url.trim().trim_end_matches('/').to_string(),
            configured_branch: branch
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from),
            branch: OnceCell::new(),
        }
    }

    /// Migrate every attachment of one entity, in source order.
    ///
    /// With `dry_run` the records are computed without downloading or
    /// uploading anything.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::DisguisedErrorPayload`] when a download is a
    /// JSON error document, and any tracker error as is.
    pub async fn migrate(
        &self,
        owner_type: EntityType,
        owner_id: u64,
        dry_run: bool,
    ) -> Result<Vec<MigratedAttachment>, MigrateError> {
        let attachments = self.source.attachments(owner_type, owner_id).await?;
        if attachments.is_empty() {
            return Ok(Vec::new());
        }
        let branch = self.branch().await?;

        let mut records = Vec::with_capacity(attachments.len());
        for attachment in &attachments {
            let record = self.record(attachment, branch);
            if !dry_run {
                self.upload(attachment, &record.destination_path, branch)
                    .await?;
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Repository path of an attachment.
    #[must_use]
    pub fn destination_path(attachment: &SourceAttachment) -> String {
        format!(
            "{ATTACHMENT_ROOT}/{}/{}/{}{}",
            attachment.owner_type,
            attachment.owner_id,
            attachment.id,
            attachment.extension()
        )
    }

    fn record(&self, attachment: &SourceAttachment, branch: &str) -> MigratedAttachment {
        let path = Self::destination_path(attachment);
        MigratedAttachment {
            source_attachment_id: attachment.id,
            original_name: attachment.original_filename.clone(),
            destination_url: format!(
                "{}/{}/blob/{branch}/{path}",
                self.web_url,
                self.destination.repo()
            ),
            destination_path: path,
        }
    }

    async fn upload(
        &self,
        attachment: &SourceAttachment,
        path: &str,
        branch: &str,
    ) -> Result<(), MigrateError> {
        if self.destination.file_exists(path, branch).await? {
            tracing::debug!(path, "attachment already present");
            return Ok(());
        }
        let content = self.source.download(attachment.id).await?;
        check_error_payload(attachment.id, &content)?;

        let message = format!(
            "Import TP attachment {}#{} ({})",
            attachment.owner_type, attachment.owner_id, attachment.id
        );
        let uploaded = self
            .destination
            .upload_file(path, &content, branch, &message)
            .await?;
        if uploaded {
            tracing::info!(path, bytes = content.len(), "uploaded attachment");
        } else {
            tracing::debug!(path, "attachment already present");
        }
        Ok(())
    }

    async fn branch(&self) -> Result<&str, MigrateError> {
        let branch = self
            .branch
            .get_or_try_init(|| async {
                match &self.configured_branch {
                    Some(branch) => Ok(branch.clone()),
                    None => self.destination.default_branch().await,
                }
            })
            .await?;
        Ok(branch.as_str())
    }
}

/// Reject bytes that are a TargetProcess JSON error document
/// (`{"Status": ..., "Message": ...}`) rather than file content.
pub(crate) fn check_error_payload(attachment_id: u64, content: &[u8]) -> Result<(), MigrateError> {
    let Ok(object) = serde_json::from_slice::<Map<String, Value>>(content) else {
        return Ok(());
    };
    match (object.get("Status"), object.get("Message")) {
        (Some(status), Some(message)) => Err(MigrateError::DisguisedErrorPayload {
            attachment_id,
            status: plain(status),
            message: plain(message),
        }),
        _ => Ok(()),
    }
}

fn plain(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), String::from)
}
