//! One extract-transform-load run over files

use super::{Extractor, Pipeline, RecordTransformer, Report};
use crate::format::{Delimiter, FormatTag};
use crate::hooks::HookRegistry;
use crate::record::{Record, RecordSet};
use crate::storage::{DestinationWriter, SourceReader};

use eyre::Result;
use std::path::{Path, PathBuf};

/// Where a job's records come from
#[derive(Debug, Clone)]
pub enum Source {
    /// Read and decode a file when the job runs
    File(SourceReader),
    /// Records already in memory
    Records(RecordSet),
}

impl From<SourceReader> for Source {
    fn from(reader: SourceReader) -> Self {
        Source::File(reader)
    }
}

impl From<RecordSet> for Source {
    fn from(records: RecordSet) -> Self {
        Source::Records(records)
    }
}

impl Extractor for Source {
    type Item = Record;

    fn extract(&self) -> Result<Vec<Self::Item>> {
        match self {
            Source::File(reader) => reader.read(),
            Source::Records(records) => Ok(records.clone()),
        }
    }
}

/// Output side of a job
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: FormatTag,
    pub delimiter: Delimiter,
    /// Name of a transform hook in the job's [`HookRegistry`]
    pub hook: Option<String>,
}

impl OutputConfig {
    pub fn new(path: impl AsRef<Path>, format: impl Into<FormatTag>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: format.into(),
            delimiter: Delimiter::default(),
            hook: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_hook(mut self, name: impl Into<String>) -> Self {
        self.hook = Some(name.into());
        self
    }
}

/// A fully wired ETL run
///
/// Building a job binds the requested hook, so a missing or mistyped hook
/// fails before anything is read or written. [`Job::run`] consumes the job.
///
/// # Example
/// ```no_run
/// use record_etl::etl::{Job, OutputConfig};
/// use record_etl::hooks::HookRegistry;
/// use record_etl::storage::SourceReader;
///
/// let source = SourceReader::new("people.csv", "CSV");
/// let output = OutputConfig::new("people.json", "JSON");
/// let report = Job::new(source, output, HookRegistry::new())?.run()?;
/// println!("wrote {} records", report.loaded);
/// # Ok::<(), eyre::Report>(())
/// ```
pub struct Job {
    pipeline: Pipeline<Source, RecordTransformer, DestinationWriter>,
}

impl Job {
    /// Wire up a job
    ///
    /// # Errors
    /// Returns [`crate::EtlError::MethodNotFound`] or
    /// [`crate::EtlError::MethodNotCallable`] when `output.hook` names a hook
    /// that cannot be bound.
    pub fn new(source: impl Into<Source>, output: OutputConfig, hooks: HookRegistry) -> Result<Self> {
        let transformer = match &output.hook {
            Some(name) => RecordTransformer::with_hooks(hooks.resolve(name)?),
            None => {
                if !hooks.is_empty() {
                    log::debug!("No hook requested, ignoring {:?}", hooks.names());
                }
                RecordTransformer::built_in(output.format.clone(), output.delimiter)
            }
        };
        let writer = DestinationWriter::new(&output.path, output.format)
            .with_hook_output(transformer.uses_hook());

        let source = source.into();
        match &source {
            Source::File(reader) => log::debug!(
                "Job: {} -> {}",
                reader.path().display(),
                writer.path().display()
            ),
            Source::Records(records) => log::debug!(
                "Job: {} in-memory records -> {}",
                records.len(),
                writer.path().display()
            ),
        }

        Ok(Self {
            pipeline: Pipeline::new(source, transformer, writer),
        })
    }

    pub fn run(self) -> Result<Report> {
        self.pipeline.run()
    }
}
