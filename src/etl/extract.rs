//! Extractor trait for reading items from a source

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors read the whole source in one call and return its items in
/// source order.
///
/// # Example
/// ```no_run
/// use record_etl::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for LineExtractor {
///     type Item = String;
///
///     fn extract(&self) -> Result<Vec<Self::Item>> {
///         let text = std::fs::read_to_string(&self.path)?;
///         Ok(text.lines().map(str::to_string).collect())
///     }
/// }
/// ```
pub trait Extractor {
    /// The type of items extracted
    type Item;

    /// Extract all items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, decoding, unsupported format)
    fn extract(&self) -> Result<Vec<Self::Item>>;
}
