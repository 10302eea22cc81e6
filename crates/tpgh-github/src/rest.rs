//! GitHub REST client scoped to one repository.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tpgh_core::{DestinationIssue, ProvenanceMarker};

use crate::error::GitHubError;
use crate::http::{check_response, escape_path, is_existing_parent_link};

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Results requested per marker search. More than one exact hit is an error
/// for the caller, so this only needs headroom for fuzzy near-misses.
const SEARCH_PAGE_SIZE: u32 = 10;

#[derive(Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "no_assignees")]
    assignees: &'a [String],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_assignees(assignees: &&[String]) -> bool {
    assignees.is_empty()
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<DestinationIssue>,
}

#[derive(Deserialize)]
struct RepositoryInfo {
    default_branch: String,
}

#[derive(Serialize)]
struct PutContent<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

/// REST client for issues, sub-issues, subscriptions and repository contents.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client for `repo` (`owner/name`) authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Config`] when the token or repository is blank
    /// or the token contains characters that cannot go in a header, and
    /// [`GitHubError::Http`] if the HTTP client cannot be built.
    pub fn new(token: &str, repo: &str, api_url: &str) -> Result<Self, GitHubError> {
        Self::with_timeout(token, repo, api_url, Duration::from_secs(30))
    }

    /// Like [`Self::new`] with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn with_timeout(
        token: &str,
        repo: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        if token.trim().is_empty() {
            return Err(GitHubError::Config("access token is required".into()));
        }
        if repo.trim().is_empty() {
            return Err(GitHubError::Config("repo is required".into()));
        }

        Ok(Self {
            http: build_http(token, timeout)?,
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            repo: repo.trim().to_string(),
        })
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    // ── Issues ─────────────────────────────────────────────────────────

    /// Create an issue. Empty `assignees` are omitted from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] on any non-success status.
    pub async fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignees: &[String],
    ) -> Result<DestinationIssue, GitHubError> {
        let url = self.url(&format!("/repos/{}/issues", self.repo), &[])?;
        let resp = self
            .http
            .post(url)
            .json(&CreateIssue {
                title,
                body,
                assignees,
            })
            .send()
            .await?;
        let resp = check_response(resp, "create issue").await?;
        Ok(resp.json().await?)
    }

    /// Issues whose body contains `marker` verbatim.
    ///
    /// GitHub's `in:body` phrase search is token based, so results are
    /// re-filtered locally on the exact rendered marker.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] on any non-success status.
    pub async fn find_issues_by_marker(
        &self,
        marker: &ProvenanceMarker,
    ) -> Result<Vec<DestinationIssue>, GitHubError> {
        let query = format!("repo:{} in:body \"{marker}\"", self.repo);
        let per_page = SEARCH_PAGE_SIZE.to_string();
        let url = self.url(
            "/search/issues",
            &[("q", query.as_str()), ("per_page", per_page.as_str())],
        )?;
        tracing::debug!(%marker, "searching issues by marker");

        let resp = check_response(self.http.get(url).send().await?, "issue search").await?;
        let found: SearchResponse = resp.json().await?;
        Ok(found
            .items
            .into_iter()
            .filter(|issue| marker.is_in(issue.body()))
            .collect())
    }

    /// Unsubscribe and ignore notifications for an issue.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] on any non-success status.
    pub async fn mute_issue(&self, issue_number: u64) -> Result<(), GitHubError> {
        let url = self.url(
            &format!("/repos/{}/issues/{issue_number}/subscription", self.repo),
            &[],
        )?;
        let resp = self
            .http
            .put(url)
            .json(&serde_json::json!({ "subscribed": false, "ignored": true }))
            .send()
            .await?;
        check_response(resp, "mute issue").await?;
        Ok(())
    }

    /// Attach `child_issue_id` (database id) under `parent_issue_number`.
    ///
    /// Returns `true` when the link was created and `false` when GitHub
    /// rejects it because it already exists or the child already has a
    /// parent.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] for every other non-success status.
    pub async fn add_sub_issue(
        &self,
        parent_issue_number: u64,
        child_issue_id: u64,
    ) -> Result<bool, GitHubError> {
        let url = self.url(
            &format!("/repos/{}/issues/{parent_issue_number}/sub_issues", self.repo),
            &[],
        )?;
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "sub_issue_id": child_issue_id }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        let message = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNPROCESSABLE_ENTITY && is_existing_parent_link(&message) {
            return Ok(false);
        }
        Err(GitHubError::Api {
            operation: "add sub-issue",
            status: status.as_u16(),
            message,
        })
    }

    // ── Contents ───────────────────────────────────────────────────────

    /// The repository's default branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] on any non-success status.
    pub async fn default_branch(&self) -> Result<String, GitHubError> {
        let url = self.url(&format!("/repos/{}", self.repo), &[])?;
        let resp = check_response(self.http.get(url).send().await?, "repository lookup").await?;
        let info: RepositoryInfo = resp.json().await?;
        Ok(info.default_branch)
    }

    /// Whether a file exists at `path` on `git_ref`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] for any status other than success or 404.
    pub async fn file_exists(&self, path: &str, git_ref: &str) -> Result<bool, GitHubError> {
        let url = self.contents_url(path, &[("ref", git_ref)])?;
        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_response(resp, "content lookup").await?;
        Ok(true)
    }

    /// Commit `content` at `path` on `branch` unless a file is already there.
    ///
    /// Returns `false` without writing when the path exists: uploads never
    /// overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] if the lookup or the upload fails.
    pub async fn upload_file(
        &self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> Result<bool, GitHubError> {
        if self.file_exists(path, branch).await? {
            tracing::debug!(path, "file already present, skipping upload");
            return Ok(false);
        }

        let url = self.contents_url(path, &[])?;
        let resp = self
            .http
            .put(url)
            .json(&PutContent {
                message,
                content: STANDARD.encode(content),
                branch,
            })
            .send()
            .await?;
        check_response(resp, "upload file").await?;
        Ok(true)
    }

    // ── Plumbing ───────────────────────────────────────────────────────

    fn contents_url(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url, GitHubError> {
        self.url(
            &format!("/repos/{}/contents/{}", self.repo, escape_path(path)),
            params,
        )
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url, GitHubError> {
        let raw = format!("{}{path}", self.api_url);
        let parsed = if params.is_empty() {
            reqwest::Url::parse(&raw)
        } else {
            reqwest::Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| GitHubError::Config(format!("invalid request URL {raw}: {e}")))
    }
}

/// Shared client with GitHub's required headers.
pub(crate) fn build_http(token: &str, timeout: Duration) -> Result<reqwest::Client, GitHubError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
        .map_err(|_| GitHubError::Config("access token is not a valid header value".into()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

    Ok(reqwest::Client::builder()
        .user_agent("tp-to-github")
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_token_and_repo() {
        assert!(matches!(
            GitHubClient::new(" ", "o/r", DEFAULT_API_URL),
            Err(GitHubError::Config(ref m)) if m.contains("token")
        ));
        assert!(matches!(
            GitHubClient::new("t", "", DEFAULT_API_URL),
            Err(GitHubError::Config(ref m)) if m.contains("repo")
        ));
    }

    #[test]
    fn create_payload_omits_empty_assignees() {
        let payload = serde_json::to_value(CreateIssue {
            title: "Hello",
            body: "World",
            assignees: &[],
        })
        .unwrap();
        assert_eq!(payload, serde_json::json!({"title": "Hello", "body": "World"}));
    }
}
