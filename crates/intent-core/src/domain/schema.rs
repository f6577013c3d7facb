//! Schema Contract - 生成結果の出力スキーマ
//!
//! The generation capability receives this schema alongside the prompt and is
//! asked to return JSON conforming to it. Parsing on our side
//! (`JobSpecification::from_generated`) enforces the same contract, so a
//! capability that ignores the schema still cannot leak a bad value.

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn wire_name(self) -> &'static str {
        match self {
            FieldKind::String => "STRING",
            FieldKind::Number => "NUMBER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// Object schema where every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    fields: Vec<SchemaField>,
}

impl OutputSchema {
    /// フィールド一覧からスキーマを作成
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// The six-field job specification contract.
    pub fn job_specification() -> Self {
        Self::new(vec![
            SchemaField {
                name: "title",
                kind: FieldKind::String,
                description: "A technical title for the job",
            },
            SchemaField {
                name: "description",
                kind: FieldKind::String,
                description: "Technical summary of the workload",
            },
            SchemaField {
                name: "recommendedGpu",
                kind: FieldKind::String,
                description: "Specific GPU model recommendation",
            },
            SchemaField {
                name: "estimatedDuration",
                kind: FieldKind::String,
                description: "Estimated time to complete",
            },
            SchemaField {
                name: "maxPrice",
                kind: FieldKind::Number,
                description: "Recommended max price per hour in USD",
            },
            SchemaField {
                name: "reasoning",
                kind: FieldKind::String,
                description: "Why this hardware was chosen",
            },
        ])
    }

    /// 定義順のフィールド
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// 必須フィールド名（全フィールド）
    pub fn required(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Render in the capability's schema dialect.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.to_string(),
                json!({
                    "type": field.kind.wire_name(),
                    "description": field.description,
                }),
            );
        }
        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SentinelFallback;

    #[test]
    fn job_specification_schema_requires_all_six_fields() {
        let schema = OutputSchema::job_specification();
        assert_eq!(
            schema.required(),
            vec!["title", "description", "recommendedGpu", "estimatedDuration", "maxPrice", "reasoning"]
        );

        let v = schema.to_json();
        assert_eq!(v["type"], "OBJECT");
        assert_eq!(v["properties"]["maxPrice"]["type"], "NUMBER");
        assert_eq!(v["properties"]["title"]["type"], "STRING");
        assert_eq!(v["required"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn schema_field_names_match_the_specification_wire_names() {
        let spec = serde_json::to_value(SentinelFallback::sentinel()).unwrap();
        let mut wire: Vec<&str> = spec.as_object().unwrap().keys().map(String::as_str).collect();
        let mut required = OutputSchema::job_specification().required();
        wire.sort_unstable();
        required.sort_unstable();
        assert_eq!(wire, required);
    }
}
