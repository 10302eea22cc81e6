//! TargetProcess v1 JSON shapes and their mapping onto core types.

use serde::Deserialize;
use serde_json::{Map, Value};
use tpgh_core::{EntityType, ParentRef, SourceAttachment, SourceEntity};

/// Collection envelope: `{ "Items": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ItemsPage<T> {
    #[serde(rename = "Items")]
    pub items: Vec<T>,
}

/// Work item as returned by collection and single-entity endpoints.
///
/// Parent references arrive as nested objects keyed by the parent's resource
/// name (`"Feature": {"Id": 5, ...}`), so everything not named here is kept
/// in `rest` and looked up by [`EntityType::parent_type`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpEntity {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effort: Option<f64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl TpEntity {
    pub fn into_source(self, entity_type: EntityType) -> SourceEntity {
        let parent_ref = entity_type.parent_type().and_then(|parent| {
            self.rest
                .get(parent.as_str())
                .and_then(|obj| obj.get("Id"))
                .and_then(Value::as_u64)
                .map(|id| ParentRef {
                    entity_type: parent,
                    id,
                })
        });

        SourceEntity {
            id: self.id,
            entity_type,
            name: self.name.unwrap_or_default(),
            description_html: self.description.unwrap_or_default(),
            parent_ref,
            effort: self.effort,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpAttachment {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl TpAttachment {
    pub fn into_source(self, owner_type: EntityType, owner_id: u64) -> SourceAttachment {
        SourceAttachment {
            id: self.id,
            owner_type,
            owner_id,
            original_filename: self.name.unwrap_or_default(),
        }
    }
}

/// `GET /api/v1/Attachments/{id}?select=Id,UniqueFileName`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpAttachmentFile {
    pub unique_file_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpUser {
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_story_with_feature_parent() {
        let raw: TpEntity = serde_json::from_str(
            r#"{
                "Id": 36406,
                "Name": "Story",
                "Description": "<p>Hi</p>",
                "Effort": 3.5,
                "Project": {"ResourceType": "Project", "Id": 1},
                "Feature": {"ResourceType": "Feature", "Id": 55, "Name": "Login"}
            }"#,
        )
        .unwrap();

        let entity = raw.into_source(EntityType::UserStory);
        assert_eq!(entity.id, 36_406);
        assert_eq!(entity.description_html, "<p>Hi</p>");
        assert_eq!(entity.effort, Some(3.5));
        assert_eq!(
            entity.parent_ref,
            Some(ParentRef {
                entity_type: EntityType::Feature,
                id: 55
            })
        );
    }

    #[test]
    fn null_fields_become_empty() {
        let raw: TpEntity =
            serde_json::from_str(r#"{"Id": 1, "Name": null, "Description": null, "Feature": null}"#)
                .unwrap();
        let entity = raw.into_source(EntityType::UserStory);
        assert_eq!(entity.name, "");
        assert_eq!(entity.description_html, "");
        assert_eq!(entity.parent_ref, None);
    }

    #[test]
    fn projects_have_no_parent() {
        let raw: TpEntity = serde_json::from_str(r#"{"Id": 10, "Name": "P"}"#).unwrap();
        assert_eq!(raw.into_source(EntityType::Project).parent_ref, None);
    }
}
