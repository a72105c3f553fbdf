//! Error kinds raised by the ETL core
//!
//! Every public operation returns `eyre::Result`; the variants below are the
//! ones a caller may want to tell apart. Recover them with
//! `report.downcast_ref::<EtlError>()`.

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    /// A format tag outside {CSV, JSON, XML}, at read, transform or write time.
    #[error("unsupported format: '{0}'")]
    UnsupportedFormat(String),

    /// A capability that is deliberately missing (reading XML sources).
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// No hook is registered under the requested name.
    #[error("hook '{0}' does not exist")]
    MethodNotFound(String),

    /// A hook exists under the name but cannot be invoked the way it is needed.
    #[error("hook '{0}' is not callable as {1}")]
    MethodNotCallable(String, &'static str),

    #[error("invalid delimiter '{0}': expected a single ASCII character or TAB")]
    InvalidDelimiter(String),

    /// A header entry that cannot be used as an XML element name.
    #[error("invalid XML tag name: '{0}'")]
    InvalidTagName(String),

    #[error("failed to decode {format} source: {message}")]
    Decode { format: Format, message: String },

    #[error("failed to encode {format} output: {message}")]
    Encode { format: Format, message: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
