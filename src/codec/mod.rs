//! Per-format encode and decode rules
//!
//! Each [`Format`] maps to one [`Codec`] through [`codec_for`]. Adding a
//! format means adding a variant and its entry there.
//!
//! Output is built in two stages. A [`RecordEncoder`] turns each record into
//! at most one [`Fragment`]; [`assemble`] then turns the fragment list into the
//! final file content.

mod delimited;
mod json;
mod xml;

pub use delimited::CsvCodec;
pub use json::JsonCodec;
pub use xml::XmlCodec;

use crate::error::EtlError;
use crate::format::{Delimiter, Format, FormatTag};
use crate::record::{Fragment, Record, RecordSet};

/// Options that only matter when reading a source
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions<'a> {
    pub delimiter: Delimiter,
    /// Field names to bind positionally; when set, every line is data
    pub header: Option<&'a [String]>,
}

/// Stateful per-record serializer for one output run
pub trait RecordEncoder {
    /// Encode one record, or consume it without output
    fn encode(&mut self, record: &Record) -> Result<Option<Fragment>, EtlError>;
}

/// Decode and encode rules for one file format
pub trait Codec: Sync {
    fn format(&self) -> Format;

    /// Whether [`Codec::decode`] is available at all
    ///
    /// Lets a reader fail before touching the filesystem.
    fn can_decode(&self) -> bool {
        true
    }

    /// Parse a whole document into records, in document order
    fn decode(&self, text: &str, options: &DecodeOptions<'_>) -> Result<RecordSet, EtlError>;

    /// A fresh encoder for one output run
    fn encoder(&self, delimiter: Delimiter) -> Box<dyn RecordEncoder>;

    /// Join the fragments of a non-empty run into the file content
    fn finalize(&self, fragments: Vec<Fragment>) -> Result<String, EtlError>;
}

/// Look up the codec for a format
pub fn codec_for(format: Format) -> &'static dyn Codec {
    match format {
        Format::Csv => &CsvCodec,
        Format::Json => &JsonCodec,
        Format::Xml => &XmlCodec,
    }
}

/// Turn collected fragments into final file content
///
/// Returns `None` when there is nothing to write. Fragments produced by a
/// custom transform hook are concatenated with no separator; otherwise the
/// target format's codec finalizes them.
pub fn assemble(
    target: &FormatTag,
    hook_used: bool,
    fragments: Vec<Fragment>,
) -> Result<Option<String>, EtlError> {
    if fragments.is_empty() {
        return Ok(None);
    }
    if hook_used {
        return Ok(Some(fragments.concat()));
    }
    let format = target.resolve()?;
    codec_for(format).finalize(fragments).map(Some)
}
