use serde_json::Value;
use tracing::warn;

use crate::core::model::{Fragment, KEY_DOCUMENT_TYPE, KEY_SIDES_DETECTED, KEY_SOURCE_FILES};

/// Normalizes raw service records into fragments, in input order.
/// Non-object entries are dropped with a warning; inside an object every
/// missing key is treated as absent and every value is coerced to a
/// string, so a malformed response can never crash resolution.
pub fn normalize_fragments(raw: Vec<Value>) -> Vec<Fragment> {
    raw.into_iter()
        .filter_map(|value| match value {
            Value::Object(record) => Some(normalize_record(record)),
            other => {
                warn!(value = %other, "dropping non-object extraction record");
                None
            }
        })
        .collect()
}

fn normalize_record(record: serde_json::Map<String, Value>) -> Fragment {
    let mut fragment = Fragment {
        document_type: "Unknown".to_string(),
        ..Fragment::default()
    };

    for (key, value) in record {
        match key.as_str() {
            KEY_DOCUMENT_TYPE => {
                if let Some(kind) = coerce_scalar(&value) {
                    fragment.document_type = kind;
                }
            }
            KEY_SIDES_DETECTED => fragment.sides_detected = coerce_string_list(value),
            KEY_SOURCE_FILES => fragment.source_files = coerce_string_list(value),
            _ => fragment.fields.insert(&key, coerce_scalar(&value)),
        }
    }

    fragment
}

/// Coerces any JSON value to its string form. Blank strings and nulls
/// become absent; nested values are kept as compact JSON text rather than
/// rejected, since downstream comparisons only ever see strings.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn coerce_string_list(value: Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };

    let mut out: Vec<String> = Vec::new();
    for item in &items {
        if let Some(text) = coerce_scalar(item) {
            if !out.iter().any(|existing| existing == &text) {
                out.push(text);
            }
        }
    }
    out
}
