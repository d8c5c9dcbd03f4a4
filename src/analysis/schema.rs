//! Structured output schema for the analysis response.
//!
//! One field table, rendered in the two dialects the backends understand:
//! Gemini's `responseSchema` (upper-case OpenAPI subset) and plain JSON
//! Schema for OpenAI's `json_schema` response format.

use super::types::Level;
use serde_json::{json, Map, Value};

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON number
    Number,
    /// JSON string
    String,
    /// JSON array of strings
    StringArray,
}

/// One required property of the response object
#[derive(Debug, Clone, Copy)]
pub struct SchemaField {
    /// Wire name
    pub name: &'static str,
    /// Value type
    pub kind: FieldType,
    /// Hint given to the model
    pub description: &'static str,
    /// Allowed values for string fields
    pub allowed: &'static [&'static str],
}

const LEVELS: [&str; 3] = [
    Level::ALL[0].as_str(),
    Level::ALL[1].as_str(),
    Level::ALL[2].as_str(),
];

const ANALYSIS_FIELDS: [SchemaField; 9] = [
    field("score", FieldType::Number, "Overall quality score from 0-100"),
    SchemaField {
        name: "level",
        kind: FieldType::String,
        description: "Beginner, Intermediate, or Advanced",
        allowed: &LEVELS,
    },
    field(
        "summary",
        FieldType::String,
        "A concise 2-3 sentence executive summary of the repo quality.",
    ),
    field("strengths", FieldType::StringArray, "List of 3-4 key strengths identified."),
    field(
        "weaknesses",
        FieldType::StringArray,
        "List of 3-4 key areas needing improvement.",
    ),
    field(
        "roadmap",
        FieldType::StringArray,
        "Ordered list of 3-5 actionable steps for the student to improve the project.",
    ),
    field("consistencyScore", FieldType::Number, "Sub-score for consistency 0-100"),
    field("documentationScore", FieldType::Number, "Sub-score for documentation 0-100"),
    field("bestPracticesScore", FieldType::Number, "Sub-score for best practices 0-100"),
];

const fn field(name: &'static str, kind: FieldType, description: &'static str) -> SchemaField {
    SchemaField {
        name,
        kind,
        description,
        allowed: &[],
    }
}

/// The fixed schema every analysis response must satisfy
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSchema {
    /// Schema name, used where the backend wants one
    pub name: &'static str,
    /// Required properties in output order
    pub fields: &'static [SchemaField],
}

impl AnalysisSchema {
    /// The repository analysis schema
    pub const fn analysis() -> Self {
        Self {
            name: "repository_analysis",
            fields: &ANALYSIS_FIELDS,
        }
    }

    /// Names of all required properties
    pub fn required(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Gemini `responseSchema` rendering
    pub fn to_gemini(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut property = match field.kind {
                FieldType::Number => json!({ "type": "NUMBER" }),
                FieldType::String => json!({ "type": "STRING" }),
                FieldType::StringArray => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            };
            property["description"] = json!(field.description);
            if !field.allowed.is_empty() {
                property["format"] = json!("enum");
                property["enum"] = json!(field.allowed);
            }
            properties.insert(field.name.to_string(), property);
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required(),
            "propertyOrdering": self.required(),
        })
    }

    /// JSON Schema rendering, strict-mode compatible
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut property = match field.kind {
                FieldType::Number => json!({ "type": "number" }),
                FieldType::String => json!({ "type": "string" }),
                FieldType::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            };
            property["description"] = json!(field.description);
            if !field.allowed.is_empty() {
                property["enum"] = json!(field.allowed);
            }
            properties.insert(field.name.to_string(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
            "additionalProperties": false,
        })
    }
}
