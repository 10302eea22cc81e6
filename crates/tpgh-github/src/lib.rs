//! # tpgh-github
//!
//! GitHub clients used as the migration destination:
//! - [`GitHubClient`]: REST, scoped to one repository (issues, marker search,
//!   subscriptions, sub-issues, repository contents)
//! - [`ProjectsClient`]: GraphQL, Projects v2 boards (discovery, items,
//!   fields, number field updates, issue node ids)

mod error;
mod graphql;
mod http;
mod rest;

pub use error::GitHubError;
pub use graphql::{Board, BoardField, BoardItem, DEFAULT_GRAPHQL_URL, ProjectsClient};
pub use rest::{DEFAULT_API_URL, GitHubClient};
