//! TargetProcess (source tracker) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default page size for collection fetches (`take`).
const fn default_page_size() -> u32 {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetProcessConfig {
    /// Instance URL (e.g., `https://example.tpondemand.com`).
    #[serde(default)]
    pub base_url: String,

    /// Basic-auth user name.
    #[serde(default)]
    pub username: String,

    /// Basic-auth password.
    #[serde(default)]
    pub password: String,

    /// Team whose work items are migrated. `0` means unset.
    #[serde(default)]
    pub team_id: u64,

    /// Items requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for TargetProcessConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            team_id: 0,
            page_size: default_page_size(),
        }
    }
}

impl TargetProcessConfig {
    /// Check if the credentials and instance URL are present.
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("base_url");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.trim().is_empty() {
            missing.push("password");
        }
        missing
    }

    /// Validate everything a migration run needs from this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when credentials are missing and
    /// [`ConfigError::InvalidValue`] for a malformed URL, a zero team id or a
    /// zero page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "targetprocess".into(),
                missing: missing.join(", "),
            });
        }
        crate::validate_url("targetprocess.base_url", &self.base_url)?;
        if self.team_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "targetprocess.team_id".into(),
                reason: "team id is required".into(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "targetprocess.page_size".into(),
                reason: "page size must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = TargetProcessConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.page_size, 200);
    }

    #[test]
    fn validate_reports_missing_fields() {
        let config = TargetProcessConfig {
            base_url: "https://example.tpondemand.com".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::NotConfigured { ref missing, .. } if missing == "username, password")
        );
    }

    #[test]
    fn validate_rejects_url_without_scheme() {
        let config = TargetProcessConfig {
            base_url: "not a url".into(),
            username: "u".into(),
            password: "p".into(),
            team_id: 35_411,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "targetprocess.base_url"));
    }

    #[test]
    fn validate_requires_team() {
        let config = TargetProcessConfig {
            base_url: "https://example.tpondemand.com".into(),
            username: "u".into(),
            password: "p".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "targetprocess.team_id"));
    }
}
