use serde_json::Value;

use super::Column;

/// `id` of a record as text; numbers and strings are both accepted.
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Text shown in a table cell for `column`.
pub fn cell_text(record: &Value, column: &Column) -> String {
    let parts: Vec<String> = column
        .paths
        .iter()
        .filter_map(|path| record.get(*path))
        .map(value_text)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Sí".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => object_text(value),
    }
}

// Nested relations arrive as objects; show their human name.
fn object_text(value: &Value) -> String {
    for key in ["nombre", "titulo", "username"] {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }
    let full = [value.get("nombres"), value.get("apellidos")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if !full.trim().is_empty() {
        return full.trim().to_string();
    }
    record_id(value).map(|id| format!("#{}", id)).unwrap_or_default()
}
