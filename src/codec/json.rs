//! JSON array codec

use super::{Codec, DecodeOptions, RecordEncoder};
use crate::error::EtlError;
use crate::format::{Delimiter, Format};
use crate::record::{Fragment, Record, RecordSet};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

const INDENT: &[u8] = b"    ";

/// A top-level JSON array of flat objects
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, text: &str, _options: &DecodeOptions<'_>) -> Result<RecordSet, EtlError> {
        let document: Value = serde_json::from_str(text).map_err(|e| decode_error(e.to_string()))?;
        let Value::Array(items) = document else {
            return Err(decode_error("expected a top-level array".to_string()));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(decode_error(format!(
                    "element {} is not an object: {}",
                    index, other
                ))),
            })
            .collect()
    }

    fn encoder(&self, _delimiter: Delimiter) -> Box<dyn RecordEncoder> {
        Box::new(JsonEncoder)
    }

    /// Wrap the compact per-record fragments in one indented array
    fn finalize(&self, fragments: Vec<Fragment>) -> Result<String, EtlError> {
        let items = fragments
            .iter()
            .map(|fragment| serde_json::from_str::<Value>(fragment))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| encode_error(e.to_string()))?;

        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
        Value::Array(items)
            .serialize(&mut serializer)
            .map_err(|e| encode_error(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| encode_error(e.to_string()))
    }
}

struct JsonEncoder;

impl RecordEncoder for JsonEncoder {
    fn encode(&mut self, record: &Record) -> Result<Option<Fragment>, EtlError> {
        // serde_json leaves non-ASCII characters unescaped
        serde_json::to_string(record)
            .map(Some)
            .map_err(|e| encode_error(e.to_string()))
    }
}

fn decode_error(message: String) -> EtlError {
    EtlError::Decode {
        format: Format::Json,
        message,
    }
}

fn encode_error(message: String) -> EtlError {
    EtlError::Encode {
        format: Format::Json,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_pairs;
    use serde_json::json;

    fn decode(text: &str) -> Result<RecordSet, EtlError> {
        JsonCodec.decode(text, &DecodeOptions::default())
    }

    #[test]
    fn test_decode_array_of_objects() {
        let records = decode(r#"[{"id": 1, "name": "Zoé"}, {"id": 2, "name": null}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], json!("Zoé"));
        assert_eq!(records[1]["name"], Value::Null);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = decode(r#"{"id": 1}"#).unwrap_err();
        assert!(err.to_string().contains("top-level array"));
    }

    #[test]
    fn test_decode_rejects_non_object_elements() {
        let err = decode(r#"[{"id": 1}, 2]"#).unwrap_err();
        assert!(matches!(err, EtlError::Decode { format: Format::Json, .. }));
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(decode("[{").is_err());
    }

    #[test]
    fn test_encode_is_compact_and_keeps_unicode() {
        let mut encoder = JsonCodec.encoder(Delimiter::default());
        let record = record_from_pairs([("name", "Zoé"), ("city", "東京")]);
        assert_eq!(
            encoder.encode(&record).unwrap().as_deref(),
            Some(r#"{"name":"Zoé","city":"東京"}"#)
        );
    }

    #[test]
    fn test_finalize_indents_with_four_spaces() {
        let fragments = vec![r#"{"a":"1"}"#.to_string(), r#"{"a":"2"}"#.to_string()];
        let output = JsonCodec.finalize(fragments).unwrap();
        assert_eq!(
            output,
            "[\n    {\n        \"a\": \"1\"\n    },\n    {\n        \"a\": \"2\"\n    }\n]"
        );
    }

    #[test]
    fn test_finalize_round_trips_through_decode() {
        let records = vec![
            record_from_pairs([("b", "é"), ("a", "x")]),
            record_from_pairs([("b", "2"), ("a", "y")]),
        ];
        let mut encoder = JsonCodec.encoder(Delimiter::default());
        let fragments = records
            .iter()
            .map(|r| encoder.encode(r).unwrap().unwrap())
            .collect();
        let output = JsonCodec.finalize(fragments).unwrap();
        assert_eq!(decode(&output).unwrap(), records);
    }
}
