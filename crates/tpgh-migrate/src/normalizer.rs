//! Builds issue titles and bodies from source entities.
//!
//! Body layout, each section omitted when empty and sections separated by a
//! blank line:
//!
//! ```text
//! <description as Markdown>
//!
//! ### Tasks
//! - [ ] <task>
//!
//! ### Attachments
//! - [<name>](<url>)
//!
//! _Imported from TargetProcess: [#<id>](<base>/entity/<id>)_
//!
//! <!--tp:<Type>:<id>-->
//! ```

use serde::Serialize;
use tpgh_core::{MigratedAttachment, ProvenanceMarker, SourceEntity};

use crate::ports::MarkdownConverter;

/// Descriptions starting with this comment are already Markdown.
pub const MARKDOWN_SENTINEL: &str = "<!--markdown-->";

/// Destination-ready issue content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIssue {
    pub title: String,
    pub body: String,
}

/// Converted user story as printed by `tpgh stories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryPreview {
    pub id: u64,
    pub name: String,
    pub description_markdown: String,
}

pub struct EntityNormalizer {
    converter: Box<dyn MarkdownConverter>,
    base_url: String,
}

impl EntityNormalizer {
    /// `base_url` is the TargetProcess site used for the back-link; blank
    /// disables the link.
    #[must_use]
    pub fn new(converter: Box<dyn MarkdownConverter>, base_url: &str) -> Self {
        Self {
            converter,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn normalize(
        &self,
        entity: &SourceEntity,
        tasks: &[SourceEntity],
        attachments: &[MigratedAttachment],
    ) -> NormalizedIssue {
        let mut sections = Vec::with_capacity(5);

        let description = self.description_markdown(&entity.description_html);
        if !description.trim().is_empty() {
            sections.push(description);
        }
        if let Some(tasks) = task_section(tasks) {
            sections.push(tasks);
        }
        if let Some(attachments) = attachment_section(attachments) {
            sections.push(attachments);
        }
        sections.push(self.import_note(entity.id));
        sections.push(ProvenanceMarker::new(entity.entity_type, entity.id).to_string());

        NormalizedIssue {
            title: title(entity),
            body: sections.join("\n\n") + "\n",
        }
    }

    /// Description plus import note, without tasks, attachments or marker.
    #[must_use]
    pub fn preview(&self, entity: &SourceEntity) -> StoryPreview {
        let description = self.description_markdown(&entity.description_html);
        let mut parts = Vec::with_capacity(2);
        if !description.trim().is_empty() {
            parts.push(description);
        }
        parts.push(self.import_note(entity.id));

        StoryPreview {
            id: entity.id,
            name: entity.name.clone(),
            description_markdown: parts.join("\n\n") + "\n",
        }
    }

    /// Markdown for a raw description. Sentinel-prefixed text passes through
    /// untouched; blank input yields an empty string.
    #[must_use]
    pub fn description_markdown(&self, html: &str) -> String {
        if let Some(markdown) = html.strip_prefix(MARKDOWN_SENTINEL) {
            return markdown.to_string();
        }
        if html.trim().is_empty() {
            return String::new();
        }
        self.converter.convert(html)
    }

    fn import_note(&self, id: u64) -> String {
        if self.base_url.is_empty() {
            format!("_Imported from TargetProcess: #{id}_")
        } else {
            format!(
                "_Imported from TargetProcess: [#{id}]({}/entity/{id})_",
                self.base_url
            )
        }
    }
}

fn title(entity: &SourceEntity) -> String {
    let name = entity.name.trim();
    if name.is_empty() {
        format!("{} #{}", entity.entity_type, entity.id)
    } else {
        name.to_string()
    }
}

fn task_section(tasks: &[SourceEntity]) -> Option<String> {
    let lines: Vec<String> = tasks
        .iter()
        .map(|task| task.name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| format!("- [ ] {name}"))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("### Tasks\n{}", lines.join("\n")))
}

fn attachment_section(attachments: &[MigratedAttachment]) -> Option<String> {
    let lines: Vec<String> = attachments
        .iter()
        .filter(|att| !att.original_name.is_empty() && !att.destination_url.is_empty())
        .map(|att| format!("- [{}]({})", att.original_name, att.destination_url))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("### Attachments\n{}", lines.join("\n")))
}
