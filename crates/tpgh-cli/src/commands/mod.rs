use tpgh_config::TpghConfig;

use crate::cli::{Commands, OutputFormat};

pub mod board;
pub mod migrate;
pub mod stories;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: TpghConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Migrate(args) => migrate::handle(&args, config, format).await,
        Commands::Stories(args) => stories::handle(&args, config, format).await,
        Commands::Board(args) => board::handle(&args, config, format).await,
    }
}
