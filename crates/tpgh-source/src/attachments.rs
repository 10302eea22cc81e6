//! Attachment listing and binary download.

use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::header::ACCEPT_ENCODING;
use tpgh_core::{EntityType, SourceAttachment};

use crate::error::SourceError;
use crate::http::check_response;
use crate::wire::{TpAttachment, TpAttachmentFile};
use crate::{SELECT_FIELDS, TargetProcessClient};

/// Leading bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

impl TargetProcessClient {
    /// Attachments owned by one entity, in TargetProcess order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn attachments_for(
        &self,
        owner_type: EntityType,
        owner_id: u64,
    ) -> Result<Vec<SourceAttachment>, SourceError> {
        let filter =
            format!("General.Id eq {owner_id} and General.EntityType.Name eq '{owner_type}'");
        let raw: Vec<TpAttachment> = self
            .collection("/api/v1/Attachments", Some(&filter), SELECT_FIELDS)
            .await?;
        Ok(raw
            .into_iter()
            .map(|att| att.into_source(owner_type, owner_id))
            .collect())
    }

    /// Download the raw bytes of one attachment.
    ///
    /// Resolves the stored file name first, then reads `attachment.aspx`
    /// asking for identity encoding. Some TargetProcess servers gzip the
    /// payload anyway; such bodies are inflated before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if either request fails or a gzip body is
    /// corrupt.
    pub async fn download_attachment(&self, attachment_id: u64) -> Result<Vec<u8>, SourceError> {
        let meta_url = self.url(
            &format!("/api/v1/Attachments/{attachment_id}"),
            &[("select", "Id,UniqueFileName")],
        )?;
        let resp = check_response(self.get(meta_url).send().await?).await?;
        let file: TpAttachmentFile = resp.json().await?;

        let id = attachment_id.to_string();
        let url = self.url(
            "/attachment.aspx",
            &[("attachmentId", id.as_str()), ("filename", file.unique_file_name.as_str())],
        )?;
        tracing::debug!(attachment_id, file = %file.unique_file_name, "downloading attachment");

        let resp = check_response(
            self.get(url)
                .header(ACCEPT_ENCODING, "identity")
                .send()
                .await?,
        )
        .await?;
        let bytes = resp.bytes().await?;
        maybe_gunzip(attachment_id, bytes.to_vec())
    }
}

/// Inflate `bytes` when they start with the gzip magic number.
pub(crate) fn maybe_gunzip(attachment_id: u64, bytes: Vec<u8>) -> Result<Vec<u8>, SourceError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }
    let mut inflated = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|source| SourceError::Decompress {
            attachment_id,
            source,
        })?;
    tracing::debug!(
        attachment_id,
        compressed = bytes.len(),
        inflated = inflated.len(),
        "attachment was gzip-encoded"
    );
    Ok(inflated)
}
