use anyhow::Context;
use serde::Serialize;
use tpgh_config::TpghConfig;
use tpgh_github::BoardField;
use tpgh_migrate::ProjectBoard;

use crate::bootstrap::apply_board_overrides;
use crate::cli::{BoardArgs, OutputFormat};
use crate::{clients, output};

#[derive(Debug, Serialize)]
struct BoardResponse {
    org: String,
    name: String,
    id: String,
    fields: Vec<BoardField>,
}

/// Handle `tpgh board`: resolve the board and list its fields, mainly to
/// pick an estimate field.
pub async fn handle(
    args: &BoardArgs,
    mut config: TpghConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    apply_board_overrides(&mut config, args);
    if !config.board.is_configured() {
        anyhow::bail!("board org and name are required (board.org/board.name or --board-org/--board)");
    }
    if config.github.token.trim().is_empty() {
        anyhow::bail!("github.token is required to read boards");
    }

    let projects = clients::projects(&config)?;
    let board = ProjectBoard::new(&projects, &config.board.org);
    let id = board
        .resolve_board(&config.board.name)
        .await
        .context("failed to resolve board")?;
    let fields = board
        .list_fields(&id)
        .await
        .context("failed to list board fields")?;

    output::output(
        &BoardResponse {
            org: config.board.org,
            name: config.board.name,
            id,
            fields,
        },
        format,
    )
}
