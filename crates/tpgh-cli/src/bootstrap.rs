use anyhow::Context;
use tpgh_config::TpghConfig;

use crate::cli::{BoardArgs, MigrateArgs, StoriesArgs};

pub fn load_config() -> anyhow::Result<TpghConfig> {
    TpghConfig::load_with_dotenv().context("failed to load tpgh configuration")
}

/// Apply `migrate` flags on top of loaded configuration.
pub fn apply_migrate_overrides(config: &mut TpghConfig, args: &MigrateArgs) {
    if let Some(team_id) = args.team_id {
        config.targetprocess.team_id = team_id;
    }
    if args.dry_run {
        config.migration.dry_run = true;
    }
    if let Some(path) = &args.assignee_map {
        config.migration.assignee_map = path.display().to_string();
    }
    apply_board_overrides(
        config,
        &BoardArgs {
            board: args.board.clone(),
            board_org: args.board_org.clone(),
        },
    );
    if let Some(field) = &args.estimate_field {
        config.board.estimate_field.clone_from(field);
    }
}

pub fn apply_stories_overrides(config: &mut TpghConfig, args: &StoriesArgs) {
    if let Some(team_id) = args.team_id {
        config.targetprocess.team_id = team_id;
    }
}

pub fn apply_board_overrides(config: &mut TpghConfig, args: &BoardArgs) {
    if let Some(name) = &args.board {
        config.board.name.clone_from(name);
    }
    if let Some(org) = &args.board_org {
        config.board.org.clone_from(org);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn migrate_flags_override_config() {
        let mut config = TpghConfig::default();
        config.targetprocess.team_id = 1;
        config.board.org = "acme".into();

        apply_migrate_overrides(
            &mut config,
            &MigrateArgs {
                team_id: Some(35_411),
                dry_run: true,
                board: Some("Roadmap".into()),
                board_org: None,
                estimate_field: Some("Estimate".into()),
                assignee_map: Some(PathBuf::from("map.txt")),
            },
        );

        assert_eq!(config.targetprocess.team_id, 35_411);
        assert!(config.migration.dry_run);
        assert_eq!(config.migration.assignee_map, "map.txt");
        assert_eq!(config.board.org, "acme");
        assert_eq!(config.board.name, "Roadmap");
        assert_eq!(config.board.estimate_field, "Estimate");
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = TpghConfig::default();
        config.targetprocess.team_id = 7;
        config.migration.dry_run = true;

        apply_migrate_overrides(&mut config, &MigrateArgs::default());
        apply_stories_overrides(&mut config, &StoriesArgs::default());

        assert_eq!(config.targetprocess.team_id, 7);
        assert!(config.migration.dry_run);
        assert!(config.board.name.is_empty());
    }
}
