//! Human-readable structure dump of arbitrary payloads
//!
//! Renders any `Serialize` value in the indented `Array ( [key] => value )`
//! layout. Output is deterministic: map keys keep insertion order.

use serde::Serialize;
use serde_json::Value;

/// Indent step between nesting levels
const LEVEL_INDENT: usize = 8;

/// Indent of entries relative to their parentheses
const ENTRY_INDENT: usize = 4;

/// Render a payload. Values that cannot be serialized become a placeholder
/// instead of an error.
pub fn dump<T: Serialize + ?Sized>(payload: &T) -> String {
    match serde_json::to_value(payload) {
        Ok(value) => dump_value(&value),
        Err(e) => format!("[unrenderable payload: {}]", e),
    }
}

/// Render an already converted JSON value
pub fn dump_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, level: usize) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => out.push('1'),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => write_array(
            out,
            items.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            level,
        ),
        Value::Object(map) => write_array(out, map.iter().map(|(k, v)| (k.clone(), v)), level),
    }
}

fn write_array<'a>(
    out: &mut String,
    entries: impl Iterator<Item = (String, &'a Value)>,
    level: usize,
) {
    let pad = " ".repeat(level * LEVEL_INDENT);
    out.push_str("Array\n");
    out.push_str(&pad);
    out.push_str("(\n");
    for (key, value) in entries {
        out.push_str(&pad);
        out.push_str(&" ".repeat(ENTRY_INDENT));
        out.push('[');
        out.push_str(&key);
        out.push_str("] => ");
        write_value(out, value, level + 1);
        out.push('\n');
    }
    out.push_str(&pad);
    out.push_str(")\n");
}
