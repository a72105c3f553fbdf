//! Format tags and CSV delimiters

use crate::error::EtlError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The closed set of supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Json,
    Xml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Csv, Format::Json, Format::Xml];

    /// Guess a format from a file extension (`.csv`, `.tsv`, `.json`, `.xml`)
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Csv => "CSV",
            Format::Json => "JSON",
            Format::Xml => "XML",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EtlError::UnsupportedFormat(s.to_string()))
    }
}

/// A format tag exactly as the caller supplied it
///
/// Tags are kept as text and only resolved to a [`Format`] when a stage
/// actually needs one, so an unknown destination tag fails on the first
/// record rather than when the job is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTag(String);

impl FormatTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn resolve(&self) -> Result<Format, EtlError> {
        self.0.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Format> for FormatTag {
    fn from(format: Format) -> Self {
        Self(format.as_str().to_string())
    }
}

impl From<&str> for FormatTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-byte CSV field separator
///
/// Parses from a single ASCII character or the alias `TAB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    pub const TAB: Delimiter = Delimiter(b'\t');

    pub fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn as_char(&self) -> char {
        self.0 as char
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter(b';')
    }
}

impl FromStr for Delimiter {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "TAB" {
            return Ok(Delimiter::TAB);
        }
        match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(Delimiter(*byte)),
            _ => Err(EtlError::InvalidDelimiter(s.to_string())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Delimiter::TAB => f.write_str("TAB"),
            other => write!(f, "{}", other.as_char()),
        }
    }
}
