//! Structural schema inference.
//!
//! Walk an already-parsed value and derive a minimal schema over the
//! restricted vocabulary `type`, `properties`, `required`, `items`,
//! `oneOf` — a subset of JSON Schema Draft-07 meant for copy-paste
//! consumption, not for a draft-compliant validator.
//!
//! Design goals:
//! - One schema per value; inference is total over anything the diagnostic
//!   parser can produce.
//! - Array element shapes dedup by structural equality (canonical
//!   fingerprints, see [`canon`]); survivors keep first-occurrence order.
//! - Each object is described independently: every key it carries is
//!   listed in `required`, with no cross-instance merging.

pub mod canon;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::depth::{DepthExceeded, MAX_DEPTH};

/// The type vocabulary the inferencer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

/// Structural schema node. Unset fields are absent from the emitted JSON.
///
/// A node never carries both `items` and `oneOf`: a heterogeneous array
/// nests its alternatives in a child node under `items`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,
}

impl JsonSchema {
    pub fn of(ty: SchemaType) -> Self {
        JsonSchema {
            ty: Some(ty),
            ..JsonSchema::default()
        }
    }
}

/// Infer the structural schema of `value`.
///
/// Total over parser output; only values built in memory deeper than
/// [`MAX_DEPTH`] fail.
pub fn infer_schema(value: &Value) -> Result<JsonSchema, DepthExceeded> {
    infer_at(value, 0)
}

fn infer_at(value: &Value, depth: usize) -> Result<JsonSchema, DepthExceeded> {
    if depth > MAX_DEPTH {
        return Err(DepthExceeded);
    }
    let schema = match value {
        Value::Null => JsonSchema::of(SchemaType::Null),
        Value::Bool(_) => JsonSchema::of(SchemaType::Boolean),
        Value::Number(_) => JsonSchema::of(SchemaType::Number),
        Value::String(_) => JsonSchema::of(SchemaType::String),
        Value::Array(elements) => {
            // dedup by canonical fingerprint; first occurrence decides order
            let mut distinct: IndexMap<String, JsonSchema> = IndexMap::new();
            for element in elements {
                let element_schema = infer_at(element, depth + 1)?;
                distinct
                    .entry(canon::fingerprint(&element_schema))
                    .or_insert(element_schema);
            }
            let mut schemas: Vec<JsonSchema> = distinct.into_values().collect();
            let mut schema = JsonSchema::of(SchemaType::Array);
            match schemas.len() {
                0 => {}
                1 => schema.items = Some(Box::new(schemas.remove(0))),
                _ => {
                    schema.items = Some(Box::new(JsonSchema {
                        one_of: Some(schemas),
                        ..JsonSchema::default()
                    }));
                }
            }
            schema
        }
        Value::Object(entries) => {
            let mut properties = IndexMap::with_capacity(entries.len());
            for (key, entry) in entries {
                properties.insert(key.clone(), infer_at(entry, depth + 1)?);
            }
            // every key of this instance is required; no cross-instance merging
            let required: Vec<String> = entries.keys().cloned().collect();
            JsonSchema {
                ty: Some(SchemaType::Object),
                properties: Some(properties),
                required: (!required.is_empty()).then_some(required),
                ..JsonSchema::default()
            }
        }
    };
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emitted(value: Value) -> Value {
        serde_json::to_value(infer_schema(&value).unwrap()).unwrap()
    }

    #[test]
    fn primitives_map_to_their_type_names() {
        assert_eq!(emitted(json!(null)), json!({"type": "null"}));
        assert_eq!(emitted(json!(true)), json!({"type": "boolean"}));
        assert_eq!(emitted(json!(4.5)), json!({"type": "number"}));
        assert_eq!(emitted(json!("x")), json!({"type": "string"}));
    }

    #[test]
    fn homogeneous_arrays_get_a_single_items_schema() {
        assert_eq!(
            emitted(json!([1, 2, 3])),
            json!({"type": "array", "items": {"type": "number"}})
        );
    }

    #[test]
    fn heterogeneous_arrays_get_one_of_in_first_occurrence_order() {
        assert_eq!(
            emitted(json!([1, "a", true])),
            json!({
                "type": "array",
                "items": {"oneOf": [
                    {"type": "number"},
                    {"type": "string"},
                    {"type": "boolean"},
                ]},
            })
        );
    }

    #[test]
    fn empty_arrays_stay_bare() {
        assert_eq!(emitted(json!([])), json!({"type": "array"}));
    }

    #[test]
    fn objects_emit_properties_and_mark_every_key_required() {
        assert_eq!(
            emitted(json!({"id": 1, "name": "x", "tags": ["a", "b"]})),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "number"},
                    "name": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}},
                },
                "required": ["id", "name", "tags"],
            })
        );
    }

    #[test]
    fn properties_and_required_follow_key_order() {
        let schema = infer_schema(&json!({"id": 1, "name": "x", "tags": []})).unwrap();
        let keys: Vec<&str> = schema
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["id", "name", "tags"]);
        assert_eq!(
            schema.required,
            Some(vec!["id".to_string(), "name".to_string(), "tags".to_string()])
        );
    }

    #[test]
    fn empty_objects_keep_properties_and_drop_required() {
        assert_eq!(emitted(json!({})), json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn equal_object_shapes_dedup_to_one_items_schema() {
        let schema = infer_schema(&json!([{"a": 1}, {"a": 2}])).unwrap();
        assert!(schema.items.is_some());
        assert!(schema.items.unwrap().one_of.is_none());
    }

    #[test]
    fn incidental_key_order_does_not_split_one_of() {
        let schema = infer_schema(&json!([{"a": 1, "b": "x"}, {"b": "y", "a": 2}])).unwrap();
        let items = schema.items.expect("one merged element schema");
        assert!(items.one_of.is_none());
        // the first occurrence decides the emitted key order
        let keys: Vec<&str> = items
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn required_presence_splits_one_of() {
        let schema = infer_schema(&json!([{}, {"a": 1}])).unwrap();
        let items = schema.items.expect("two distinct element schemas");
        assert_eq!(items.one_of.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn nested_arrays_recurse_through_the_same_rules() {
        assert_eq!(
            emitted(json!([[1, 2], [3]])),
            json!({
                "type": "array",
                "items": {"type": "array", "items": {"type": "number"}},
            })
        );
        assert_eq!(
            emitted(json!([[1], ["a"]])),
            json!({
                "type": "array",
                "items": {"oneOf": [
                    {"type": "array", "items": {"type": "number"}},
                    {"type": "array", "items": {"type": "string"}},
                ]},
            })
        );
    }

    #[test]
    fn inference_is_total_over_parser_output() {
        let value = crate::diagnose::parse(
            r#"{"xs": [[1, 2], [null], {"k": "v"}], "b": true, "s": "x"}"#,
        )
        .unwrap();
        assert!(infer_schema(&value).is_ok());
    }

    #[test]
    fn values_nested_beyond_the_bound_are_refused() {
        let deep = (0..=MAX_DEPTH).fold(json!(0), |inner, _| json!([inner]));
        assert_eq!(infer_schema(&deep).unwrap_err(), DepthExceeded);

        let at_bound = (0..MAX_DEPTH).fold(json!(0), |inner, _| json!([inner]));
        assert!(infer_schema(&at_bound).is_ok());
    }
}
