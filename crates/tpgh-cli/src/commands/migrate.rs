use std::path::Path;

use anyhow::Context;
use tpgh_config::TpghConfig;
use tpgh_migrate::{
    AssigneeMapping, BoardTarget, EntityNormalizer, Html2Md, MigrationOrchestrator, RunOptions,
};

use crate::bootstrap::apply_migrate_overrides;
use crate::cli::{MigrateArgs, OutputFormat};
use crate::{clients, output};

/// Handle `tpgh migrate`.
pub async fn handle(
    args: &MigrateArgs,
    mut config: TpghConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    apply_migrate_overrides(&mut config, args);
    config.validate().context("invalid configuration for migrate")?;

    let source = clients::target_process(&config)?;
    let github = clients::github(&config)?;
    let projects = clients::projects(&config)?;

    let assignees = AssigneeMapping::from_file(non_empty(&config.migration.assignee_map))
        .context("failed to load assignee mapping")?;
    tracing::debug!(entries = assignees.len(), "loaded assignee mapping");

    let normalizer = EntityNormalizer::new(Box::new(Html2Md), &config.targetprocess.base_url);
    let branch = config.github.branch.trim();
    let mut orchestrator = MigrationOrchestrator::new(&source, &github, normalizer)
        .with_assignees(assignees)
        .with_attachment_target(
            &config.github.web_url,
            (!branch.is_empty()).then_some(branch),
        );
    if config.board.is_configured() {
        orchestrator = orchestrator.with_board(&projects, board_target(&config));
    }

    let report = orchestrator
        .run(RunOptions {
            team_id: config.targetprocess.team_id,
            dry_run: config.migration.dry_run,
        })
        .await
        .context("migration failed")?;

    output::output(&report, format)
}

fn board_target(config: &TpghConfig) -> BoardTarget {
    let estimate_field = config.board.estimate_field.trim();
    BoardTarget {
        org: config.board.org.clone(),
        name: config.board.name.clone(),
        estimate_field: (!estimate_field.is_empty()).then(|| estimate_field.to_string()),
    }
}

fn non_empty(path: &str) -> Option<&Path> {
    let path = path.trim();
    (!path.is_empty()).then(|| Path::new(path))
}
