use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for the `tpgh` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tpgh",
    version,
    about = "Migrate TargetProcess work items into GitHub issues"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Compact single-line JSON.
    Raw,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Migrate projects, epics, features and user stories into issues.
    Migrate(MigrateArgs),
    /// Print converted user stories without touching GitHub.
    Stories(StoriesArgs),
    /// Show the configured board and its fields.
    Board(BoardArgs),
}

#[derive(Clone, Debug, Default, Args)]
pub struct MigrateArgs {
    /// TargetProcess team whose work items are migrated
    #[arg(long)]
    pub team_id: Option<u64>,

    /// Search for existing issues only; create, upload and link nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Projects v2 board title receiving every issue
    #[arg(long)]
    pub board: Option<String>,

    /// Organization owning the board
    #[arg(long)]
    pub board_org: Option<String>,

    /// Number field on the board set from the TargetProcess effort
    #[arg(long)]
    pub estimate_field: Option<String>,

    /// `email=username` mapping file for assignees
    #[arg(long)]
    pub assignee_map: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Args)]
pub struct StoriesArgs {
    /// TargetProcess team whose user stories are printed
    #[arg(long)]
    pub team_id: Option<u64>,
}

#[derive(Clone, Debug, Default, Args)]
pub struct BoardArgs {
    /// Board title (defaults to board.name)
    #[arg(long)]
    pub board: Option<String>,

    /// Organization owning the board (defaults to board.org)
    #[arg(long)]
    pub board_org: Option<String>,
}
