//! # tpgh-config
//!
//! Layered configuration loading for tpgh using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TPGH_*` prefix, `__` as separator)
//! 2. Project-level `.tpgh/config.toml`
//! 3. User-level `~/.config/tpgh/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TPGH_GITHUB__TOKEN` -> `github.token`,
//! `TPGH_TARGETPROCESS__BASE_URL` -> `targetprocess.base_url`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tpgh_config::TpghConfig;
//!
//! let config = TpghConfig::load_with_dotenv().expect("config");
//! config.validate().expect("migration settings");
//! println!("migrating into {}", config.github.repo);
//! ```

mod board;
mod error;
mod github;
mod migration;
mod targetprocess;

pub use board::BoardConfig;
pub use error::ConfigError;
pub use github::GitHubConfig;
pub use migration::MigrationConfig;
pub use targetprocess::TargetProcessConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TpghConfig {
    #[serde(default)]
    pub targetprocess: TargetProcessConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
}

impl TpghConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be read or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".tpgh/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TPGH_").split("__"))
    }

    /// Validate every section a migration run depends on.
    ///
    /// Runs before any network call so misconfiguration fails fast.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking `targetprocess`,
    /// then `github`, then `board`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.targetprocess.validate()?;
        self.github.validate()?;
        self.board.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tpgh").join("config.toml"))
    }
}

/// Reject values that do not parse as absolute URLs with a scheme.
pub(crate) fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value.trim())
        .map(|_| ())
        .map_err(|error| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("not a valid URL: {error}"),
        })
}
