//! The analysis schema: the shape a classification reply must take.
//!
//! The field table is the single source of truth. It is rendered to a JSON
//! Schema object for the oracle's `response_format`, and its names match the
//! serialized form of [`AnalysisResult`](crate::AnalysisResult).

use serde_json::{Map, Value, json};

use crate::oracle::ResponseSchema;

pub const SCHEMA_NAME: &str = "skin_analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Text,
    TextList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
}

const fn field(
    name: &'static str,
    kind: FieldKind,
    description: &'static str,
    required: bool,
) -> SchemaField {
    SchemaField {
        name,
        kind,
        description,
        required,
    }
}

pub const ANALYSIS_FIELDS: &[SchemaField] = &[
    field(
        "isSkin",
        FieldKind::Boolean,
        "Whether the image is clearly human skin.",
        true,
    ),
    field(
        "isHealthy",
        FieldKind::Boolean,
        "Whether the skin appears healthy without notable rashes or lesions.",
        true,
    ),
    field(
        "diseaseName",
        FieldKind::Text,
        "Likely name of the skin condition.",
        false,
    ),
    field(
        "description",
        FieldKind::Text,
        "A detailed medical overview of the condition.",
        false,
    ),
    field(
        "treatments",
        FieldKind::TextList,
        "Recommended treatment approaches.",
        false,
    ),
    field(
        "medicines",
        FieldKind::TextList,
        "Common over-the-counter or clinical medicines often used.",
        false,
    ),
    field(
        "symptoms",
        FieldKind::TextList,
        "Key visual or sensory symptoms.",
        false,
    ),
    field(
        "reasons",
        FieldKind::TextList,
        "Common causes or triggers for this condition.",
        false,
    ),
    field(
        "healingPeriod",
        FieldKind::Text,
        "Typical duration for recovery.",
        false,
    ),
    field(
        "precautions",
        FieldKind::TextList,
        "Immediate precautions to take.",
        false,
    ),
    field(
        "prevention",
        FieldKind::TextList,
        "Long-term prevention strategies.",
        false,
    ),
];

fn field_to_json(field: &SchemaField) -> Value {
    match field.kind {
        FieldKind::Boolean => json!({
            "type": "boolean",
            "description": field.description
        }),
        FieldKind::Text => json!({
            "type": "string",
            "description": field.description
        }),
        FieldKind::TextList => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": field.description
        }),
    }
}

/// Renders the field table as a JSON Schema object.
pub fn analysis_schema() -> Value {
    let properties: Map<String, Value> = ANALYSIS_FIELDS
        .iter()
        .map(|f| (f.name.to_string(), field_to_json(f)))
        .collect();
    let required: Vec<&str> = ANALYSIS_FIELDS
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn analysis_response_schema() -> ResponseSchema {
    ResponseSchema {
        name: SCHEMA_NAME.to_string(),
        schema: analysis_schema(),
    }
}
