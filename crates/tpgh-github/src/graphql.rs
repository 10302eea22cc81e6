//! GitHub GraphQL client for Projects v2 boards.
//!
//! Every list query follows the `pageInfo { hasNextPage endCursor }`
//! convention and is drained completely.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GitHubError;
use crate::http::check_response;
use crate::rest::build_http;

/// Default GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const PROJECTS_QUERY: &str = r"
query($org: String!, $after: String) {
  organization(login: $org) {
    projectsV2(first: 100, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes { id title }
    }
  }
}";

const ITEMS_QUERY: &str = r"
query($project: ID!, $after: String) {
  node(id: $project) {
    ... on ProjectV2 {
      items(first: 100, after: $after) {
        pageInfo { hasNextPage endCursor }
        nodes {
          id
          content { ... on Issue { id } }
        }
      }
    }
  }
}";

const FIELDS_QUERY: &str = r"
query($project: ID!, $after: String) {
  node(id: $project) {
    ... on ProjectV2 {
      fields(first: 50, after: $after) {
        pageInfo { hasNextPage endCursor }
        nodes {
          ... on ProjectV2FieldCommon { id name dataType }
        }
      }
    }
  }
}";

const ADD_ITEM_MUTATION: &str = r"
mutation($project: ID!, $content: ID!) {
  addProjectV2ItemById(input: {projectId: $project, contentId: $content}) {
    item { id }
  }
}";

const SET_NUMBER_MUTATION: &str = r"
mutation($project: ID!, $item: ID!, $field: ID!, $value: Float!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $project, itemId: $item, fieldId: $field, value: { number: $value }
  }) {
    projectV2Item { id }
  }
}";

const ISSUE_NODE_QUERY: &str = r"
query($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    issue(number: $number) { id }
  }
}";

// ── Public records ─────────────────────────────────────────────────────

/// A Projects v2 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
}

/// An item on a board. `content_id` is the issue node id, absent for draft
/// items and pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardItem {
    pub id: String,
    pub content_id: Option<String>,
}

/// A custom field of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardField {
    pub id: String,
    pub name: String,
    /// `NUMBER`, `TEXT`, `SINGLE_SELECT`, ...
    pub data_type: Option<String>,
}

// ── Wire shapes ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    nodes: Vec<Option<T>>,
}

#[derive(Deserialize)]
struct OrgData {
    organization: Option<OrgProjects>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgProjects {
    projects_v2: Connection<Board>,
}

#[derive(Deserialize)]
struct NodeData<T> {
    node: Option<T>,
}

#[derive(Deserialize)]
struct ProjectItems {
    items: Connection<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    id: String,
    content: Option<RawContent>,
}

#[derive(Deserialize)]
struct RawContent {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ProjectFields {
    fields: Connection<RawField>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    id: Option<String>,
    name: Option<String>,
    data_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemData {
    add_project_v2_item_by_id: Option<AddedItem>,
}

#[derive(Deserialize)]
struct AddedItem {
    item: IdOnly,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetFieldData {
    update_project_v2_item_field_value: Option<UpdatedItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedItem {
    project_v2_item: Option<IdOnly>,
}

#[derive(Deserialize)]
struct RepositoryData {
    repository: Option<RepositoryIssue>,
}

#[derive(Deserialize)]
struct RepositoryIssue {
    issue: Option<IdOnly>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

// ── Client ─────────────────────────────────────────────────────────────

/// GraphQL client for board discovery, items and fields.
pub struct ProjectsClient {
    http: reqwest::Client,
    graphql_url: String,
}

impl ProjectsClient {
    /// # Errors
    ///
    /// Returns [`GitHubError::Config`] when the token is blank or not a
    /// valid header value.
    pub fn new(token: &str, graphql_url: &str) -> Result<Self, GitHubError> {
        Self::with_timeout(token, graphql_url, Duration::from_secs(30))
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn with_timeout(
        token: &str,
        graphql_url: &str,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        if token.trim().is_empty() {
            return Err(GitHubError::Config("access token is required".into()));
        }
        Ok(Self {
            http: build_http(token, timeout)?,
            graphql_url: graphql_url.trim().to_string(),
        })
    }

    /// Every Projects v2 board of `org`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the organization does not exist
    /// and [`GitHubError`] for transport or GraphQL failures.
    pub async fn boards(&self, org: &str) -> Result<Vec<Board>, GitHubError> {
        let mut boards = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let data: OrgData = self
                .query(
                    "list projects",
                    PROJECTS_QUERY,
                    json!({ "org": org, "after": after }),
                )
                .await?;
            let projects = data
                .organization
                .ok_or_else(|| GitHubError::NotFound(format!("organization {org}")))?
                .projects_v2;
            boards.extend(projects.nodes.into_iter().flatten());
            match next_cursor(projects.page_info) {
                Some(cursor) => after = Some(cursor),
                None => return Ok(boards),
            }
        }
    }

    /// Every item on a board.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the board id does not resolve.
    pub async fn items(&self, board_id: &str) -> Result<Vec<BoardItem>, GitHubError> {
        let mut items = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let data: NodeData<ProjectItems> = self
                .query(
                    "list project items",
                    ITEMS_QUERY,
                    json!({ "project": board_id, "after": after }),
                )
                .await?;
            let page = data
                .node
                .ok_or_else(|| GitHubError::NotFound(format!("project {board_id}")))?
                .items;
            items.extend(page.nodes.into_iter().flatten().map(|raw| BoardItem {
                id: raw.id,
                content_id: raw.content.and_then(|c| c.id),
            }));
            match next_cursor(page.page_info) {
                Some(cursor) => after = Some(cursor),
                None => return Ok(items),
            }
        }
    }

    /// Every field of a board. Fields without an id or name are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the board id does not resolve.
    pub async fn fields(&self, board_id: &str) -> Result<Vec<BoardField>, GitHubError> {
        let mut fields = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let data: NodeData<ProjectFields> = self
                .query(
                    "list project fields",
                    FIELDS_QUERY,
                    json!({ "project": board_id, "after": after }),
                )
                .await?;
            let page = data
                .node
                .ok_or_else(|| GitHubError::NotFound(format!("project {board_id}")))?
                .fields;
            fields.extend(page.nodes.into_iter().flatten().filter_map(|raw| {
                Some(BoardField {
                    id: raw.id?,
                    name: raw.name?,
                    data_type: raw.data_type,
                })
            }));
            match next_cursor(page.page_info) {
                Some(cursor) => after = Some(cursor),
                None => return Ok(fields),
            }
        }
    }

    /// Add an issue (by node id) to a board, returning the new item id.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] for transport or GraphQL failures.
    pub async fn add_item(&self, board_id: &str, issue_node_id: &str) -> Result<String, GitHubError> {
        let data: AddItemData = self
            .query(
                "add project item",
                ADD_ITEM_MUTATION,
                json!({ "project": board_id, "content": issue_node_id }),
            )
            .await?;
        data.add_project_v2_item_by_id
            .map(|added| added.item.id)
            .ok_or_else(|| GitHubError::Parse("addProjectV2ItemById returned no item".into()))
    }

    /// Overwrite a number field on one item.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] for transport or GraphQL failures.
    pub async fn set_number_field(
        &self,
        board_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), GitHubError> {
        let data: SetFieldData = self
            .query(
                "update project field",
                SET_NUMBER_MUTATION,
                json!({ "project": board_id, "item": item_id, "field": field_id, "value": value }),
            )
            .await?;
        data.update_project_v2_item_field_value
            .and_then(|updated| updated.project_v2_item)
            .map(|_| ())
            .ok_or_else(|| {
                GitHubError::Parse("updateProjectV2ItemFieldValue returned no item".into())
            })
    }

    /// Node id of an issue looked up by repository and number.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the repository or issue is
    /// missing.
    pub async fn issue_node_id(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, GitHubError> {
        let data: RepositoryData = self
            .query(
                "issue lookup",
                ISSUE_NODE_QUERY,
                json!({ "owner": owner, "repo": repo, "number": number }),
            )
            .await?;
        let repository = data
            .repository
            .ok_or_else(|| GitHubError::NotFound(format!("repository {owner}/{repo}")))?;
        repository
            .issue
            .map(|issue| issue.id)
            .ok_or_else(|| GitHubError::NotFound(format!("issue #{number} in {owner}/{repo}")))
    }

    /// Run one GraphQL request and return its `data`.
    async fn query<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: Value,
    ) -> Result<T, GitHubError> {
        let resp = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let envelope: Envelope<T> = check_response(resp, operation).await?.json().await?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GitHubError::GraphQl { operation, message });
        }
        envelope
            .data
            .ok_or_else(|| GitHubError::Parse(format!("{operation}: response has no data")))
    }
}

fn next_cursor(page_info: PageInfo) -> Option<String> {
    if page_info.has_next_page {
        page_info.end_cursor
    } else {
        None
    }
}
