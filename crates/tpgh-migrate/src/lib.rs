//! # tpgh-migrate
//!
//! Migration engine moving a TargetProcess hierarchy into GitHub issues.
//!
//! - [`MigrationOrchestrator`] fetches projects, epics, features and user
//!   stories, then migrates them parents first.
//! - [`IssueRepository`] finds issues by their provenance marker and only
//!   creates what is missing, so runs can be repeated.
//! - [`AttachmentMigrator`] republishes attachments at deterministic
//!   repository paths.
//! - [`AssigneeMapping`] maps TargetProcess emails to GitHub usernames.
//! - [`EntityNormalizer`] renders titles and bodies.
//! - [`ProjectBoard`] places issues on a Projects v2 board.
//!
//! The engine talks to the trackers through the [`ports`] traits;
//! implementations for the HTTP clients live in this crate as well.

mod adapters;
pub mod assignees;
pub mod attachments;
pub mod board;
mod error;
pub mod issues;
pub mod normalizer;
pub mod orchestrator;
pub mod ports;
pub mod report;
pub mod tree;

pub use assignees::AssigneeMapping;
pub use attachments::AttachmentMigrator;
pub use board::ProjectBoard;
pub use error::MigrateError;
pub use issues::{IssueRepository, UpsertOutcome};
pub use normalizer::{EntityNormalizer, NormalizedIssue, StoryPreview};
pub use orchestrator::{BoardTarget, MigrationOrchestrator, RunOptions};
pub use ports::{BoardTracker, Html2Md, IssueTracker, MarkdownConverter, SourceTracker};
pub use report::{EntityOutcome, MigratedEntity, MigrationReport};
pub use tree::MigrationTree;
