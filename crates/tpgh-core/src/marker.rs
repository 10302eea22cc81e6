//! Provenance marker: the only join key between TargetProcess and GitHub.
//!
//! Rendered as an invisible HTML comment on the last line of every migrated
//! issue body, e.g. `<!--tp:UserStory:36406-->`. The rendering must stay
//! byte-stable across runs: the idempotency search looks for it verbatim.

use std::fmt;
use std::str::FromStr;

use crate::entity::EntityType;
use crate::errors::CoreError;

const PREFIX: &str = "<!--";
const SUFFIX: &str = "-->";
const TAG: &str = "tp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProvenanceMarker {
    pub entity_type: EntityType,
    pub id: u64,
}

impl ProvenanceMarker {
    #[must_use]
    pub const fn new(entity_type: EntityType, id: u64) -> Self {
        Self { entity_type, id }
    }

    /// The bare tag without comment delimiters: `tp:{type}:{id}`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{TAG}:{}:{}", self.entity_type, self.id)
    }

    /// Whether `body` carries exactly this marker.
    ///
    /// The closing `-->` is part of the match, so `tp:Epic:12` never matches
    /// a body marked `tp:Epic:123`.
    #[must_use]
    pub fn is_in(&self, body: &str) -> bool {
        body.contains(&self.to_string())
    }
}

impl fmt::Display for ProvenanceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}{SUFFIX}", self.tag())
    }
}

impl FromStr for ProvenanceMarker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidMarker(s.to_string());
        let inner = s
            .trim()
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(SUFFIX))
            .ok_or_else(invalid)?;

        let mut parts = inner.split(':');
        let (Some(TAG), Some(entity_type), Some(id), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            entity_type: entity_type.parse().map_err(|_| invalid())?,
            id: id.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_as_html_comment() {
        let marker = ProvenanceMarker::new(EntityType::Project, 35_256);
        assert_eq!(marker.to_string(), "<!--tp:Project:35256-->");
        assert_eq!(marker.tag(), "tp:Project:35256");
    }

    #[test]
    fn parse_roundtrips_display() {
        let marker = ProvenanceMarker::new(EntityType::UserStory, 36_406);
        let parsed: ProvenanceMarker = marker.to_string().parse().unwrap();
        assert_eq!(parsed, marker);
    }

    #[test]
    fn parse_rejects_foreign_comments() {
        assert!("<!--markdown-->".parse::<ProvenanceMarker>().is_err());
        assert!("<!--tp:Bug:1-->".parse::<ProvenanceMarker>().is_err());
        assert!("<!--tp:Epic:x-->".parse::<ProvenanceMarker>().is_err());
        assert!("tp:Epic:1".parse::<ProvenanceMarker>().is_err());
    }

    #[test]
    fn is_in_does_not_match_id_prefixes() {
        let short = ProvenanceMarker::new(EntityType::Epic, 12);
        let body = "text\n\n<!--tp:Epic:123-->\n";
        assert!(!short.is_in(body));
        assert!(ProvenanceMarker::new(EntityType::Epic, 123).is_in(body));
    }
}
