//! Records and the values they carry

use serde_json::{Map, Value};

/// One flat row: field name to scalar value, in source order
pub type Record = Map<String, Value>;

/// Records in source order
pub type RecordSet = Vec<Record>;

/// Ordered field names
pub type Header = Vec<String>;

/// One unit of output text, produced per record before final assembly
pub type Fragment = String;

/// Render a field value as plain text
///
/// Text is returned as-is and null becomes the empty string. Numbers and
/// booleans use their JSON spelling; nested values are written as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build a record from `(name, value)` pairs, keeping their order
pub fn record_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
