//! GitHub (destination tracker) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".into()
}

fn default_web_url() -> String {
    "https://github.com".into()
}

/// Default per-request timeout in seconds.
const fn default_http_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// Access token sent as a bearer credential.
    #[serde(default)]
    pub token: String,

    /// Target repository as `owner/name`.
    #[serde(default)]
    pub repo: String,

    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// GraphQL endpoint.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Web base URL used to build attachment blob links.
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Branch receiving attachments. Empty means the repository default branch.
    #[serde(default)]
    pub branch: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: String::new(),
            api_url: default_api_url(),
            graphql_url: default_graphql_url(),
            web_url: default_web_url(),
            branch: String::new(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl GitHubConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty() && !self.repo.trim().is_empty()
    }

    /// Split `repo` into `(owner, name)`.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repo.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token or repository is missing, the
    /// repository is not `owner/name`, or an endpoint URL is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.token.trim().is_empty() {
            missing.push("token");
        }
        if self.repo.trim().is_empty() {
            missing.push("repo");
        }
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "github".into(),
                missing: missing.join(", "),
            });
        }
        if self.owner_and_name().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "github.repo".into(),
                reason: format!("expected 'owner/name', got '{}'", self.repo),
            });
        }
        crate::validate_url("github.api_url", &self.api_url)?;
        crate::validate_url("github.graphql_url", &self.graphql_url)?;
        crate::validate_url("github.web_url", &self.web_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_github_com() {
        let config = GitHubConfig::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.graphql_url, "https://api.github.com/graphql");
        assert_eq!(config.web_url, "https://github.com");
        assert!(!config.is_configured());
    }

    #[test]
    fn splits_owner_and_name() {
        let config = GitHubConfig {
            repo: "octo-org/octo-repo".into(),
            ..Default::default()
        };
        assert_eq!(config.owner_and_name(), Some(("octo-org", "octo-repo")));
    }

    #[test]
    fn rejects_repo_without_owner() {
        let config = GitHubConfig {
            token: "t".into(),
            repo: "octo-repo".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "github.repo"
        ));
    }
}
