//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the trait definitions for building pipelines that
//! extract records from a source, transform them into output fragments, and
//! load those fragments to a destination, plus the [`Job`] that wires the
//! file-backed stages together.

mod extract;
mod job;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use job::{Job, OutputConfig, Source};
pub use load::Loader;
pub use pipeline::{Pipeline, Report};
pub use transform::{RecordTransformer, Transformer};
