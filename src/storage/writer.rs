//! File-backed fragment destination

use crate::codec::assemble;
use crate::error::EtlError;
use crate::etl::Loader;
use crate::format::FormatTag;
use crate::record::Fragment;

use eyre::Result;
use std::path::{Path, PathBuf};

/// Assemble fragments and overwrite the destination file
///
/// Nothing is created or truncated when there are no fragments.
#[derive(Debug, Clone)]
pub struct DestinationWriter {
    path: PathBuf,
    format: FormatTag,
    hook_output: bool,
}

impl DestinationWriter {
    pub fn new(path: impl AsRef<Path>, format: impl Into<FormatTag>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: format.into(),
            hook_output: false,
        }
    }

    /// Fragments come from a transform hook and are written as-is
    pub fn with_hook_output(mut self, hook_output: bool) -> Self {
        self.hook_output = hook_output;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the assembled content, returning whether the file was written
    ///
    /// # Errors
    /// - [`EtlError::UnsupportedFormat`] for an unknown tag when fragments need finalizing
    /// - [`EtlError::Write`] if the file cannot be written
    pub fn write(&self, fragments: Vec<Fragment>) -> Result<bool> {
        let Some(content) = assemble(&self.format, self.hook_output, fragments)? else {
            log::warn!(
                "Nothing to write, leaving {} untouched",
                self.path.display()
            );
            return Ok(false);
        };

        std::fs::write(&self.path, content).map_err(|source| EtlError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Wrote {}", self.path.display());
        Ok(true)
    }
}

// Implement Loader trait for writing destination files

impl Loader for DestinationWriter {
    type Item = Fragment;

    fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let count = items.len();
        let written = self.write(items)?;
        Ok(if written { count } else { 0 })
    }
}
