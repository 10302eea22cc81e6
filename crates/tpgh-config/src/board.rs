//! Optional Projects v2 board configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Organization owning the board.
    #[serde(default)]
    pub org: String,

    /// Exact board title.
    #[serde(default)]
    pub name: String,

    /// Number field receiving the TP effort. Empty disables estimates.
    #[serde(default)]
    pub estimate_field: String,
}

impl BoardConfig {
    /// The board integration runs only when both org and name are set.
    pub fn is_configured(&self) -> bool {
        !self.org.trim().is_empty() && !self.name.trim().is_empty()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when only one of `org` / `name`
    /// is set, which is almost certainly a typo rather than "no board".
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_org = !self.org.trim().is_empty();
        let has_name = !self.name.trim().is_empty();
        if has_org != has_name {
            let field = if has_org { "board.name" } else { "board.org" };
            return Err(ConfigError::InvalidValue {
                field: field.into(),
                reason: "board.org and board.name must be set together".into(),
            });
        }
        Ok(())
    }
}
