//! Per-run migration summary.

use serde::Serialize;
use tpgh_core::EntityType;

/// What happened to one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOutcome {
    Created,
    Found,
    /// Dry run: no issue carries the marker yet.
    WouldCreate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigratedEntity {
    pub entity_type: EntityType,
    pub id: u64,
    pub title: String,
    /// `None` only for [`EntityOutcome::WouldCreate`].
    pub issue_number: Option<u64>,
    pub outcome: EntityOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub dry_run: bool,
    pub created: usize,
    pub found: usize,
    pub would_create: usize,
    pub linked: usize,
    pub already_linked: usize,
    /// Children whose parent was not part of the run.
    pub skipped_links: usize,
    pub attachments: usize,
    pub board_items: usize,
    pub entities: Vec<MigratedEntity>,
}

impl MigrationReport {
    pub(crate) fn record(&mut self, entity: MigratedEntity) {
        match entity.outcome {
            EntityOutcome::Created => self.created += 1,
            EntityOutcome::Found => self.found += 1,
            EntityOutcome::WouldCreate => self.would_create += 1,
        }
        self.entities.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_outcomes_in_snake_case() {
        let mut report = MigrationReport::default();
        report.record(MigratedEntity {
            entity_type: EntityType::UserStory,
            id: 4,
            title: "S".into(),
            issue_number: None,
            outcome: EntityOutcome::WouldCreate,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(report.would_create, 1);
        assert_eq!(json["entities"][0]["outcome"], "would_create");
        assert_eq!(json["entities"][0]["entity_type"], "UserStory");
    }
}
