//! Wire models for the WebAPI backend.
//!
//! Response bodies use the service's PascalCase field names; request bodies
//! carry only the fields the service accepts on create/update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loaders::{FrameSeed, NewObject, ObjectPatch, ObjectSeed, UnitSeed};

/// Envelope for list responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsDto<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementDto {
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub category_names: Vec<String>,
}

impl From<ElementDto> for ObjectSeed {
    fn from(dto: ElementDto) -> Self {
        ObjectSeed {
            id: dto.web_id,
            name: dto.name,
            description: dto.description,
            path: dto.path,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDto {
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
}

impl From<AttributeDto> for ObjectSeed {
    fn from(dto: AttributeDto) -> Self {
        ObjectSeed {
            id: dto.web_id,
            name: dto.name,
            description: dto.description,
            path: dto.path,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventFrameDto {
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl From<EventFrameDto> for FrameSeed {
    fn from(dto: EventFrameDto) -> Self {
        FrameSeed {
            object: ObjectSeed {
                id: dto.web_id,
                name: dto.name,
                description: dto.description,
                path: dto.path,
            },
            start_time: dto.start_time,
            end_time: dto.end_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateDto {
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub category_names: Vec<String>,
    #[serde(default)]
    pub allow_element_to_extend: bool,
}

impl From<TemplateDto> for ObjectSeed {
    fn from(dto: TemplateDto) -> Self {
        ObjectSeed {
            id: dto.web_id,
            name: dto.name,
            description: dto.description,
            path: dto.path,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitDto {
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub factor: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub reference_factor: f64,
    #[serde(default)]
    pub reference_offset: f64,
    #[serde(default)]
    pub reference_unit_abbreviation: String,
}

impl From<UnitDto> for UnitSeed {
    fn from(dto: UnitDto) -> Self {
        UnitSeed {
            object: ObjectSeed {
                id: dto.web_id,
                name: dto.name,
                description: dto.description,
                path: dto.path,
            },
            abbreviation: dto.abbreviation,
            factor: dto.factor,
            offset: dto.offset,
            reference_factor: dto.reference_factor,
            reference_offset: dto.reference_offset,
            reference_unit_abbreviation: dto.reference_unit_abbreviation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryDto {
    pub name: String,
}

/// Create body for elements, event frames, attributes and attribute
/// templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewObjectBody {
    pub name: String,
    pub description: String,
}

impl From<&NewObject> for NewObjectBody {
    fn from(new: &NewObject) -> Self {
        NewObjectBody {
            name: new.name.clone(),
            description: new.description.clone(),
        }
    }
}

/// Update body pushed by `check_in`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatchBody {
    pub name: String,
    pub description: String,
}

impl From<&ObjectPatch> for PatchBody {
    fn from(patch: &ObjectPatch) -> Self {
        PatchBody {
            name: patch.name.clone(),
            description: patch.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_dto_decodes_service_payload() {
        let dto: ElementDto = serde_json::from_str(
            r#"{
                "WebId": "E1",
                "Name": "Pump01",
                "Description": "Feed pump",
                "Path": "\\\\Server\\Plant\\Pump01",
                "TemplateName": "PumpTemplate",
                "CategoryNames": ["Rotating"]
            }"#,
        )
        .unwrap();
        assert_eq!(dto.web_id, "E1");
        assert_eq!(dto.template_name.as_deref(), Some("PumpTemplate"));

        let seed: ObjectSeed = dto.into();
        assert_eq!(seed.path, r"\\Server\Plant\Pump01");
    }

    #[test]
    fn element_dto_tolerates_missing_optionals() {
        let dto: ElementDto = serde_json::from_str(
            r#"{"WebId": "E2", "Name": "Tank", "Path": "\\\\Server\\Plant\\Tank"}"#,
        )
        .unwrap();
        assert!(dto.description.is_empty());
        assert!(dto.template_name.is_none());
        assert!(dto.category_names.is_empty());
    }

    #[test]
    fn items_envelope_decodes() {
        let items: ItemsDto<CategoryDto> =
            serde_json::from_str(r#"{"Items": [{"Name": "Rotating"}, {"Name": "Critical"}]}"#)
                .unwrap();
        let names: Vec<_> = items.items.into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Rotating", "Critical"]);
    }

    #[test]
    fn event_frame_dto_decodes_timestamps() {
        let dto: EventFrameDto = serde_json::from_str(
            r#"{
                "WebId": "F1",
                "Name": "Batch 42",
                "Path": "\\\\Server\\Batches\\Batch 42",
                "StartTime": "2024-03-01T08:00:00Z",
                "EndTime": "2024-03-01T12:30:00Z"
            }"#,
        )
        .unwrap();
        let seed: FrameSeed = dto.into();
        assert!(seed.start_time.unwrap() < seed.end_time.unwrap());
    }

    #[test]
    fn new_object_body_serializes_pascal_case() {
        let body = NewObjectBody {
            name: "Pressure".to_string(),
            description: "Discharge pressure".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["Name"], "Pressure");
        assert_eq!(json["Description"], "Discharge pressure");
    }
}
