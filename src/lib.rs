//! Record ETL
//!
//! Extract flat records from CSV or JSON files, optionally run them through a
//! caller-supplied hook, and load them as CSV, JSON or XML.

pub mod codec;
pub mod config;
pub mod error;
pub mod etl;
pub mod format;
pub mod hooks;
pub mod record;
pub mod storage;

// Re-exports for convenience
pub use error::EtlError;
pub use etl::{Extractor, Job, Loader, OutputConfig, Pipeline, Report, Source, Transformer};
pub use format::{Delimiter, Format, FormatTag};
pub use hooks::HookRegistry;
pub use record::{Record, RecordSet};
pub use storage::{DestinationWriter, SourceReader};
