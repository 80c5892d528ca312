//! Order-normalized canonical encoding of schemas.
//!
//! Two schemas are structurally equal iff their fingerprints are
//! byte-identical. Property keys, `required` entries and `oneOf` member
//! encodings are sorted inside the fingerprint, so incidental key order
//! never splits a `oneOf`; `required` presence, `items` vs `oneOf`, and
//! every nested shape remain part of the identity.

use super::JsonSchema;

pub fn fingerprint(schema: &JsonSchema) -> String {
    let mut out = String::new();
    encode(schema, &mut out);
    out
}

fn encode(schema: &JsonSchema, out: &mut String) {
    out.push('(');
    if let Some(ty) = schema.ty {
        out.push('t');
        out.push_str(ty.as_str());
    }
    if let Some(properties) = &schema.properties {
        out.push_str("p{");
        let mut entries: Vec<(&String, &JsonSchema)> = properties.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (key, entry) in entries {
            push_quoted(out, key);
            out.push(':');
            encode(entry, out);
        }
        out.push('}');
    }
    if let Some(required) = &schema.required {
        out.push_str("r[");
        let mut keys: Vec<&String> = required.iter().collect();
        keys.sort_unstable();
        for key in keys {
            push_quoted(out, key);
        }
        out.push(']');
    }
    if let Some(items) = &schema.items {
        out.push('i');
        encode(items, out);
    }
    if let Some(one_of) = &schema.one_of {
        out.push_str("o[");
        let mut members: Vec<String> = one_of.iter().map(fingerprint).collect();
        members.sort_unstable();
        for member in members {
            out.push_str(&member);
        }
        out.push(']');
    }
    out.push(')');
}

/// Quote and escape a key so its content cannot collide with the encoding's
/// structural characters.
fn push_quoted(out: &mut String, key: &str) {
    out.push('"');
    for c in key.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::infer_schema;
    use serde_json::json;

    fn of(value: serde_json::Value) -> JsonSchema {
        infer_schema(&value).unwrap()
    }

    #[test]
    fn key_order_is_normalized_away() {
        assert_eq!(
            fingerprint(&of(json!({"a": 1, "b": "x"}))),
            fingerprint(&of(json!({"b": "y", "a": 2})))
        );
    }

    #[test]
    fn required_presence_is_part_of_the_identity() {
        let with = of(json!({"a": 1}));
        let mut without = with.clone();
        without.required = None;
        assert_ne!(fingerprint(&with), fingerprint(&without));
    }

    #[test]
    fn items_and_one_of_encode_differently() {
        assert_ne!(
            fingerprint(&of(json!([1, 2]))),
            fingerprint(&of(json!([1, "a"])))
        );
    }

    #[test]
    fn one_of_member_order_is_normalized() {
        assert_eq!(
            fingerprint(&of(json!([1, "a"]))),
            fingerprint(&of(json!(["a", 1])))
        );
    }

    #[test]
    fn quoting_keeps_exotic_keys_distinct() {
        assert_ne!(
            fingerprint(&of(json!({"a\"": 1}))),
            fingerprint(&of(json!({"a\\\"": 1})))
        );
    }
}
