use crate::error::Result;
use crate::note::{Note, SNAPSHOT_FIELD};
use schemars::schema::{InstanceType, Metadata, ObjectValidation, Schema, SchemaObject};
use std::collections::BTreeSet;

/// Structured-output schema for one correction request: an object with one
/// required string property per editable field and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionSchema {
    fields: BTreeSet<String>,
}

impl CorrectionSchema {
    /// Name reported to the API in `response_format.json_schema.name`.
    pub const NAME: &'static str = "CorrectedFields";

    pub fn for_fields<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let fields = names
            .into_iter()
            .filter(|name| *name != SNAPSHOT_FIELD)
            .map(str::to_string)
            .collect();
        Self { fields }
    }

    pub fn for_note(note: &Note) -> Self {
        Self::for_fields(note.field_names())
    }

    pub fn field_names(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn to_schema(&self) -> Schema {
        let mut object = ObjectValidation::default();

        for name in &self.fields {
            let property = SchemaObject {
                metadata: Some(Box::new(Metadata {
                    description: Some(format!("Corrected text for field: {}", name)),
                    ..Default::default()
                })),
                instance_type: Some(InstanceType::String.into()),
                ..Default::default()
            };
            object
                .properties
                .insert(name.clone(), Schema::Object(property));
            object.required.insert(name.clone());
        }
        object.additional_properties = Some(Box::new(Schema::Bool(false)));

        Schema::Object(SchemaObject {
            metadata: Some(Box::new(Metadata {
                title: Some(Self::NAME.to_string()),
                ..Default::default()
            })),
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(object)),
            ..Default::default()
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_schema())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_field_excluded() {
        let schema = CorrectionSchema::for_fields(["Front", SNAPSHOT_FIELD, "Back"]);
        let expected: BTreeSet<String> = ["Back", "Front"].iter().map(|s| s.to_string()).collect();
        assert_eq!(schema.field_names(), &expected);
        assert!(!schema.contains(SNAPSHOT_FIELD));
    }

    #[test]
    fn test_required_matches_fields() {
        let note = Note::from_pairs([("Front", "a"), ("Back", "b"), (SNAPSHOT_FIELD, "")]);
        let value = CorrectionSchema::for_note(&note).to_json().unwrap();

        assert_eq!(value["type"], json!("object"));
        assert_eq!(value["title"], json!("CorrectedFields"));
        assert_eq!(value["required"], json!(["Back", "Front"]));
        assert_eq!(value["additionalProperties"], json!(false));
        assert_eq!(value["properties"]["Front"]["type"], json!("string"));
        assert_eq!(
            value["properties"]["Back"]["description"],
            json!("Corrected text for field: Back")
        );
        assert!(value["properties"].get(SNAPSHOT_FIELD).is_none());
    }

    #[test]
    fn test_only_snapshot_field_is_empty() {
        let schema = CorrectionSchema::for_fields([SNAPSHOT_FIELD]);
        assert!(schema.is_empty());
        let value = schema.to_json().unwrap();
        assert_eq!(value["additionalProperties"], json!(false));
        let required = value.get("required").and_then(|r| r.as_array());
        assert!(required.map_or(true, |r| r.is_empty()));
    }
}
