//! # tpgh-source
//!
//! TargetProcess REST v1 client.
//!
//! Every collection read is a full `take`/`skip` walk (see [`paginate`]) with
//! a fixed `select=Id,Name,Description` projection and the mandatory
//! `EntityState.Name ne 'Done'` filter conjoined with the caller's scope.
//! Single-entity reads additionally select the parent reference and `Effort`.

mod attachments;
mod error;
mod http;
pub mod paginate;
mod wire;

pub use error::SourceError;

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tpgh_core::{EntityType, SourceEntity};

use crate::http::check_response;
use crate::paginate::paginate;
use crate::wire::{ItemsPage, TpEntity, TpUser};

/// Default page size for collection fetches.
pub const DEFAULT_TAKE: u32 = 200;

/// Projection applied to every collection fetch.
pub const SELECT_FIELDS: &str = "Id,Name,Description";

/// Lifecycle filter applied to every work-item fetch.
pub const NOT_DONE: &str = "EntityState.Name ne 'Done'";

/// HTTP client for one TargetProcess instance.
pub struct TargetProcessClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    page_size: u32,
}

impl TargetProcessClient {
    /// Create a client using basic authentication.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] before any request when a credential
    /// is blank or `base_url` is not an absolute URL, and
    /// [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, SourceError> {
        if base_url.trim().is_empty() {
            return Err(SourceError::Config("base_url is required".into()));
        }
        if username.trim().is_empty() {
            return Err(SourceError::Config("username is required".into()));
        }
        if password.trim().is_empty() {
            return Err(SourceError::Config("password is required".into()));
        }
        reqwest::Url::parse(base_url.trim())
            .map_err(|e| SourceError::Config(format!("base_url is not a valid URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent("tp-to-github")
                .default_headers(headers)
                .timeout(Duration::from_secs(30))
                .build()?,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            page_size: DEFAULT_TAKE,
        })
    }

    /// Override the number of items requested per page.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Hierarchy ──────────────────────────────────────────────────────

    /// Not-done projects owned by `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn projects(&self, team_id: u64) -> Result<Vec<SourceEntity>, SourceError> {
        self.team_collection(EntityType::Project, team_id).await
    }

    /// Not-done epics owned by `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn epics(&self, team_id: u64) -> Result<Vec<SourceEntity>, SourceError> {
        self.team_collection(EntityType::Epic, team_id).await
    }

    /// Not-done features owned by `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn features(&self, team_id: u64) -> Result<Vec<SourceEntity>, SourceError> {
        self.team_collection(EntityType::Feature, team_id).await
    }

    /// Not-done user stories owned by `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn user_stories(&self, team_id: u64) -> Result<Vec<SourceEntity>, SourceError> {
        self.team_collection(EntityType::UserStory, team_id).await
    }

    /// Not-done tasks of one user story, scoped through the story's team.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn tasks_for_user_story(
        &self,
        story_id: u64,
        team_id: u64,
    ) -> Result<Vec<SourceEntity>, SourceError> {
        let scope = format!("UserStory.Id eq {story_id} and UserStory.Team.Id eq {team_id}");
        self.fetch(EntityType::Task, Some(&scope)).await
    }

    /// Team-scoped fetch of any hierarchy level.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn team_collection(
        &self,
        entity_type: EntityType,
        team_id: u64,
    ) -> Result<Vec<SourceEntity>, SourceError> {
        let scope = format!("Team.Id eq {team_id}");
        self.fetch(entity_type, Some(&scope)).await
    }

    /// Fetch every not-done item of `entity_type` matching `scope`.
    ///
    /// Restartable: each call walks the collection again from offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn fetch(
        &self,
        entity_type: EntityType,
        scope: Option<&str>,
    ) -> Result<Vec<SourceEntity>, SourceError> {
        let filter = not_done_filter(scope);
        let path = format!("/api/v1/{}", entity_type.collection());
        let raw: Vec<TpEntity> = self.collection(&path, Some(&filter), SELECT_FIELDS).await?;
        Ok(raw
            .into_iter()
            .map(|item| item.into_source(entity_type))
            .collect())
    }

    /// Fetch one entity with its parent reference and effort.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the body is not an
    /// entity object.
    pub async fn entity(
        &self,
        entity_type: EntityType,
        id: u64,
    ) -> Result<SourceEntity, SourceError> {
        let path = format!("/api/v1/{}/{id}", entity_type.collection());
        let select = entity_select(entity_type);
        let url = self.url(&path, &[("select", select.as_str())])?;
        tracing::debug!(%entity_type, id, "fetching entity");

        let resp = check_response(self.get(url).send().await?).await?;
        let raw: TpEntity = resp.json().await?;
        Ok(raw.into_source(entity_type))
    }

    /// Emails of the users assigned to an entity. Blank emails are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any page request fails or cannot be parsed.
    pub async fn assigned_emails(
        &self,
        entity_type: EntityType,
        id: u64,
    ) -> Result<Vec<String>, SourceError> {
        let path = format!("/api/v1/{}/{id}/AssignedUser", entity_type.collection());
        let users: Vec<TpUser> = self.collection(&path, None, "Id,Email").await?;
        Ok(users
            .into_iter()
            .filter_map(|user| user.email)
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .collect())
    }

    // ── Plumbing ───────────────────────────────────────────────────────

    async fn collection<T>(
        &self,
        path: &str,
        filter: Option<&str>,
        select: &str,
    ) -> Result<Vec<T>, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let take = self.page_size.to_string();
        paginate(self.page_size, |skip| {
            let skip = skip.to_string();
            let mut params = Vec::with_capacity(4);
            if let Some(filter) = filter {
                params.push(("where", filter));
            }
            params.push(("select", select));
            params.push(("take", take.as_str()));
            params.push(("skip", skip.as_str()));
            let url = self.url(path, &params);
            async move {
                let url = url?;
                tracing::debug!(%url, "fetching page");
                let resp = check_response(self.get(url).send().await?).await?;
                let page: ItemsPage<T> = resp.json().await?;
                Ok(page.items)
            }
        })
        .await
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url, SourceError> {
        reqwest::Url::parse_with_params(&format!("{}{path}", self.base_url), params)
            .map_err(|e| SourceError::Config(format!("invalid request URL for {path}: {e}")))
    }

    fn get(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
    }
}

/// Conjoin the caller's scope with the mandatory not-done filter.
fn not_done_filter(scope: Option<&str>) -> String {
    match scope.map(str::trim).filter(|s| !s.is_empty()) {
        Some(scope) => format!("{scope} and {NOT_DONE}"),
        None => NOT_DONE.to_string(),
    }
}

/// Single-entity projection: base fields plus parent reference and effort.
fn entity_select(entity_type: EntityType) -> String {
    match entity_type.parent_type() {
        Some(parent) => format!("{SELECT_FIELDS},{parent},Effort"),
        None => format!("{SELECT_FIELDS},Effort"),
    }
}
