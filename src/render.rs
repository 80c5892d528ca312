//! Smart pretty-printing.
//!
//! Standard 2-space indentation, except arrays holding only scalars render
//! on a single line when the bracketed text stays within the width budget.
//! The decision is made while walking the value tree — never by pattern
//! matching rendered text, so brackets inside string literals cannot
//! misfire a collapse. A collapsed and an expanded rendering of the same
//! value parse back to identical values.

use serde_json::{Map, Value};

use crate::depth::{DepthExceeded, MAX_DEPTH};

const INDENT: &str = "  ";

/// Widest collapsed array line accepted, in characters.
const COLLAPSE_MAX_WIDTH: usize = 80;

pub fn pretty_print(value: &Value) -> Result<String, DepthExceeded> {
    let mut out = String::new();
    write_value(&mut out, value, 0, 0)?;
    Ok(out)
}

/// Compact rendering with no insignificant whitespace.
pub fn minify(value: &Value) -> Result<String, DepthExceeded> {
    let mut out = String::new();
    write_compact(&mut out, value, 0)?;
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &Value,
    indent: usize,
    depth: usize,
) -> Result<(), DepthExceeded> {
    if depth > MAX_DEPTH {
        return Err(DepthExceeded);
    }
    match value {
        Value::Array(elements) => write_array(out, elements, indent, depth)?,
        Value::Object(entries) => write_object(out, entries, indent, depth)?,
        scalar => push_scalar(out, scalar),
    }
    Ok(())
}

fn write_array(
    out: &mut String,
    elements: &[Value],
    indent: usize,
    depth: usize,
) -> Result<(), DepthExceeded> {
    if elements.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    if let Some(collapsed) = collapse(elements) {
        out.push_str(&collapsed);
        return Ok(());
    }
    out.push_str("[\n");
    for (index, element) in elements.iter().enumerate() {
        push_indent(out, indent + 1);
        write_value(out, element, indent + 1, depth + 1)?;
        if index + 1 < elements.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push(']');
    Ok(())
}

fn write_object(
    out: &mut String,
    entries: &Map<String, Value>,
    indent: usize,
    depth: usize,
) -> Result<(), DepthExceeded> {
    if entries.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    out.push_str("{\n");
    for (index, (key, value)) in entries.iter().enumerate() {
        push_indent(out, indent + 1);
        push_escaped(out, key);
        out.push_str(": ");
        write_value(out, value, indent + 1, depth + 1)?;
        if index + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push('}');
    Ok(())
}

fn write_compact(out: &mut String, value: &Value, depth: usize) -> Result<(), DepthExceeded> {
    if depth > MAX_DEPTH {
        return Err(DepthExceeded);
    }
    match value {
        Value::Array(elements) => {
            out.push('[');
            for (index, element) in elements.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_compact(out, element, depth + 1)?;
            }
            out.push(']');
        }
        Value::Object(entries) => {
            out.push('{');
            for (index, (key, value)) in entries.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                push_escaped(out, key);
                out.push(':');
                write_compact(out, value, depth + 1)?;
            }
            out.push('}');
        }
        scalar => push_scalar(out, scalar),
    }
    Ok(())
}

/// Single-line form `[ e1, e2 ]` for an all-scalar array, if it fits.
fn collapse(elements: &[Value]) -> Option<String> {
    if elements
        .iter()
        .any(|element| element.is_array() || element.is_object())
    {
        return None;
    }
    let mut line = String::from("[ ");
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            line.push_str(", ");
        }
        push_scalar(&mut line, element);
    }
    line.push_str(" ]");
    (line.chars().count() <= COLLAPSE_MAX_WIDTH).then_some(line)
}

// scalars only; write_array/write_object own the container cases
fn push_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => push_escaped(out, text),
        Value::Array(..) | Value::Object(..) => debug_assert!(false, "scalar expected"),
    }
}

/// JSON string literal with the same escapes serde_json emits: the two
/// mandatory escapes, short forms for the common control characters, and
/// `\u00xx` for the rest. Non-ASCII passes through as UTF-8.
fn push_escaped(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(out: &mut String, levels: usize) {
    for _ in 0..levels {
        out.push_str(INDENT);
    }
}
