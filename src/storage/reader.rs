//! File-backed record source

use crate::codec::{DecodeOptions, codec_for};
use crate::error::EtlError;
use crate::etl::Extractor;
use crate::format::{Delimiter, FormatTag};
use crate::record::{Header, Record, RecordSet};

use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// Read a whole CSV or JSON file into records
///
/// # Example
/// ```no_run
/// use record_etl::storage::SourceReader;
///
/// let records = SourceReader::new("people.csv", "CSV")
///     .with_delimiter("TAB".parse().unwrap())
///     .read()
///     .unwrap();
/// println!("{} records", records.len());
/// ```
#[derive(Debug, Clone)]
pub struct SourceReader {
    path: PathBuf,
    format: FormatTag,
    delimiter: Delimiter,
    header: Option<Header>,
}

impl SourceReader {
    pub fn new(path: impl AsRef<Path>, format: impl Into<FormatTag>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: format.into(),
            delimiter: Delimiter::default(),
            header: None,
        }
    }

    /// Field separator for CSV sources (default `;`)
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Explicit field names for a CSV source without a header line
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the source
    ///
    /// The format tag is checked before the file is opened.
    ///
    /// # Errors
    /// - [`EtlError::UnsupportedFormat`] for an unknown tag
    /// - [`EtlError::NotImplemented`] for XML
    /// - [`EtlError::Read`] if the file cannot be read as UTF-8 text
    /// - [`EtlError::Decode`] if the content does not parse
    pub fn read(&self) -> Result<RecordSet> {
        let format = self.format.resolve()?;
        let codec = codec_for(format);
        if !codec.can_decode() {
            return Err(EtlError::NotImplemented("reading XML sources").into());
        }

        log::debug!("Reading {} source {}", format, self.path.display());
        let text = std::fs::read_to_string(&self.path).map_err(|source| EtlError::Read {
            path: self.path.clone(),
            source,
        })?;

        let options = DecodeOptions {
            delimiter: self.delimiter,
            header: self.header.as_deref(),
        };
        codec
            .decode(&text, &options)
            .wrap_err_with(|| format!("Failed to extract records from {}", self.path.display()))
    }
}

// Implement Extractor trait for reading source files

impl Extractor for SourceReader {
    type Item = Record;

    fn extract(&self) -> Result<Vec<Self::Item>> {
        self.read()
    }
}
