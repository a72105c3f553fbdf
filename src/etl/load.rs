//! Loader trait for writing data to destinations

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// # Example
/// ```no_run
/// use record_etl::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LinesLoader {
///     path: PathBuf,
/// }
///
/// impl Loader for LinesLoader {
///     type Item = String;
///
///     fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         std::fs::write(&self.path, items.join("\n"))?;
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader {
    /// The type of items to load
    type Item;

    /// Load items to the destination
    ///
    /// Returns the number of items written, zero when nothing was written
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, unsupported format)
    fn load(&self, items: Vec<Self::Item>) -> Result<usize>;
}
