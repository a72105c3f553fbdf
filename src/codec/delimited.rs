//! Delimited text (CSV) codec

use super::{Codec, DecodeOptions, RecordEncoder};
use crate::error::EtlError;
use crate::format::{Delimiter, Format};
use crate::record::{Fragment, Header, Record, RecordSet, stringify};
use serde_json::Value;

/// Delimited text with an optional header line
///
/// Reading: without a header override the first line names the fields and is
/// not data. Writing: one line per record, values joined by the delimiter, no
/// header line and no quoting.
pub struct CsvCodec;

impl Codec for CsvCodec {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn decode(&self, text: &str, options: &DecodeOptions<'_>) -> Result<RecordSet, EtlError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter.as_byte())
            .has_headers(options.header.is_none())
            .flexible(true)
            .from_reader(text.as_bytes());

        let header: Header = match options.header {
            Some(names) => names.to_vec(),
            None => reader
                .headers()
                .map_err(decode_error)?
                .iter()
                .map(str::to_string)
                .collect(),
        };

        let mut records = RecordSet::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(decode_error)?;
            if row.len() > header.len() {
                log::warn!(
                    "Line {} has {} fields but the header has {}, dropping the extras",
                    index + 1,
                    row.len(),
                    header.len()
                );
            }
            let record: Record = header
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row
                        .get(i)
                        .map_or(Value::Null, |field| Value::String(field.to_string()));
                    (name.clone(), value)
                })
                .collect();
            records.push(record);
        }
        Ok(records)
    }

    fn encoder(&self, delimiter: Delimiter) -> Box<dyn RecordEncoder> {
        Box::new(CsvEncoder {
            separator: delimiter.as_char().to_string(),
        })
    }

    fn finalize(&self, fragments: Vec<Fragment>) -> Result<String, EtlError> {
        Ok(fragments.join("\n"))
    }
}

struct CsvEncoder {
    separator: String,
}

impl RecordEncoder for CsvEncoder {
    fn encode(&mut self, record: &Record) -> Result<Option<Fragment>, EtlError> {
        let line = record
            .values()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(&self.separator);
        Ok(Some(line))
    }
}

fn decode_error(err: csv::Error) -> EtlError {
    EtlError::Decode {
        format: Format::Csv,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_pairs;
    use serde_json::json;

    fn decode(text: &str, delimiter: &str, header: Option<&[String]>) -> RecordSet {
        let options = DecodeOptions {
            delimiter: delimiter.parse().unwrap(),
            header,
        };
        CsvCodec.decode(text, &options).unwrap()
    }

    #[test]
    fn test_first_line_is_header() {
        let records = decode("a;b\n1;2\n3;4", ";", None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record_from_pairs([("a", "1"), ("b", "2")]));
        assert_eq!(records[1], record_from_pairs([("a", "3"), ("b", "4")]));
    }

    #[test]
    fn test_header_override_makes_every_line_data() {
        let header = vec!["x".to_string(), "y".to_string()];
        let records = decode("a;b\n1;2", ";", Some(&header));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record_from_pairs([("x", "a"), ("y", "b")]));
        assert_eq!(records[1], record_from_pairs([("x", "1"), ("y", "2")]));
    }

    #[test]
    fn test_tab_alias() {
        let records = decode("name\tcity\nAda\tLondon", "TAB", None);
        assert_eq!(records[0]["city"], json!("London"));
    }

    #[test]
    fn test_short_rows_bind_null_and_long_rows_drop_extras() {
        let records = decode("a,b\n1\n2,3,4", ",", None);
        assert_eq!(records[0]["b"], Value::Null);
        assert_eq!(records[1], record_from_pairs([("a", "2"), ("b", "3")]));
    }

    #[test]
    fn test_header_only_source_is_empty() {
        assert!(decode("a;b\n", ";", None).is_empty());
        assert!(decode("", ";", None).is_empty());
    }

    #[test]
    fn test_quoted_fields_are_unquoted() {
        let records = decode("a;b\n\"x;y\";2", ";", None);
        assert_eq!(records[0]["a"], json!("x;y"));
    }

    #[test]
    fn test_encode_joins_values_in_field_order() {
        let mut encoder = CsvCodec.encoder(";".parse().unwrap());
        let record = record_from_pairs([("b", json!("z")), ("a", json!(7)), ("c", Value::Null)]);
        assert_eq!(encoder.encode(&record).unwrap().as_deref(), Some("z;7;"));
    }
}
