//! Row-oriented XML codec (write only)

use super::{Codec, DecodeOptions, RecordEncoder};
use crate::error::EtlError;
use crate::format::{Delimiter, Format};
use crate::record::{Fragment, Header, Record, RecordSet, stringify};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const ROOT: &str = "root";
const ROW: &str = "row";
const INDENT: usize = 2;

/// `<root>` wrapping one `<row>` per record
///
/// The first record is not data: its values name the child elements of every
/// following row. Reading XML is not supported.
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn can_decode(&self) -> bool {
        false
    }

    fn decode(&self, _text: &str, _options: &DecodeOptions<'_>) -> Result<RecordSet, EtlError> {
        Err(EtlError::NotImplemented("reading XML sources"))
    }

    fn encoder(&self, _delimiter: Delimiter) -> Box<dyn RecordEncoder> {
        Box::new(XmlEncoder {
            header: None,
            writer: new_writer(),
        })
    }

    /// Row fragments already carry their own line break and indentation
    fn finalize(&self, fragments: Vec<Fragment>) -> Result<String, EtlError> {
        let mut xml = new_writer();
        xml.write_event(Event::Start(BytesStart::new(ROOT)))
            .map_err(encode_error)?;
        for fragment in &fragments {
            xml.get_mut().extend_from_slice(fragment.as_bytes());
        }
        xml.write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(encode_error)?;
        into_string(xml.into_inner())
    }
}

struct XmlEncoder {
    header: Option<Header>,
    writer: Writer<Vec<u8>>,
}

impl RecordEncoder for XmlEncoder {
    fn encode(&mut self, record: &Record) -> Result<Option<Fragment>, EtlError> {
        if self.header.is_none() {
            self.capture_header(record)?;
            return Ok(None);
        }
        let header = self.header.as_deref().unwrap_or_default();

        let mut values = record.values();
        self.writer
            .write_event(Event::Start(BytesStart::new(ROW)))
            .map_err(encode_error)?;
        for name in header {
            // Fields missing from a short record render as empty elements
            let text = values.next().map(stringify).unwrap_or_default();
            self.writer
                .write_event(Event::Start(BytesStart::new(name.as_str())))
                .map_err(encode_error)?;
            self.writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(encode_error)?;
            self.writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .map_err(encode_error)?;
        }
        if values.next().is_some() {
            log::debug!("Record has more fields than the {} XML tag names", header.len());
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(ROW)))
            .map_err(encode_error)?;

        into_string(std::mem::take(self.writer.get_mut())).map(Some)
    }
}

impl XmlEncoder {
    fn capture_header(&mut self, record: &Record) -> Result<(), EtlError> {
        let names = record.values().map(stringify).collect::<Header>();
        if let Some(bad) = names.iter().find(|name| !is_xml_name(name)) {
            return Err(EtlError::InvalidTagName(bad.clone()));
        }
        log::debug!("XML tag names: {}", names.join(", "));

        // Rows are written one level below <root>; the opening tag itself is
        // emitted by finalize, so its bytes are dropped here.
        self.writer
            .write_event(Event::Start(BytesStart::new(ROOT)))
            .map_err(encode_error)?;
        self.writer.get_mut().clear();
        self.header = Some(names);
        Ok(())
    }
}

fn new_writer() -> Writer<Vec<u8>> {
    Writer::new_with_indent(Vec::new(), b' ', INDENT)
}

fn into_string(bytes: Vec<u8>) -> Result<String, EtlError> {
    String::from_utf8(bytes).map_err(|e| EtlError::Encode {
        format: Format::Xml,
        message: e.to_string(),
    })
}

fn encode_error(err: std::io::Error) -> EtlError {
    EtlError::Encode {
        format: Format::Xml,
        message: err.to_string(),
    }
}

/// Conservative XML name check: a letter or `_`, then letters, digits, `-`, `_`, `.`
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
