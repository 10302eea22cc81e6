//! # tpgh-core
//!
//! Core types and error types for the TargetProcess → GitHub migration.
//!
//! This crate provides the foundational types shared across all tpgh crates:
//! - [`EntityType`] with the fixed hierarchy levels and their TP collection names
//! - Source snapshots ([`SourceEntity`], [`SourceAttachment`])
//! - Destination records ([`DestinationIssue`], [`MigratedAttachment`])
//! - The [`ProvenanceMarker`] that joins the two systems
//! - Cross-cutting error types

pub mod entity;
pub mod errors;
pub mod issue;
pub mod marker;

pub use entity::{EntityType, ParentRef, SourceAttachment, SourceEntity};
pub use errors::CoreError;
pub use issue::{DestinationIssue, MigratedAttachment};
pub use marker::ProvenanceMarker;
