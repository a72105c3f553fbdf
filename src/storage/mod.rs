//! File system storage operations
//!
//! This module handles all file I/O:
//! - Reading CSV and JSON sources into records
//! - Writing assembled output to destination files

mod reader;
mod writer;

pub use reader::SourceReader;
pub use writer::DestinationWriter;
