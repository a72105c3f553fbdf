//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;
use serde::Serialize;

/// Counts from one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Items read from the source
    pub extracted: usize,
    /// Items produced by the transform stage
    pub transformed: usize,
    /// Items written to the destination
    pub loaded: usize,
}

impl Report {
    /// Whether the destination was written
    pub fn written(&self) -> bool {
        self.loaded > 0
    }
}

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// The three stages run strictly one after the other. A pipeline is consumed
/// by [`Pipeline::run`].
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```
/// use record_etl::etl::{Extractor, Loader, Pipeline, Transformer};
/// use eyre::Result;
///
/// struct Numbers;
/// impl Extractor for Numbers {
///     type Item = i32;
///     fn extract(&self) -> Result<Vec<i32>> { Ok(vec![1, 2, 3]) }
/// }
///
/// struct Square;
/// impl Transformer for Square {
///     type Input = i32;
///     type Output = i32;
///     fn transform(&mut self, input: i32) -> Result<Option<i32>> { Ok(Some(input * input)) }
/// }
///
/// struct Discard;
/// impl Loader for Discard {
///     type Item = i32;
///     fn load(&self, items: Vec<i32>) -> Result<usize> { Ok(items.len()) }
/// }
///
/// let report = Pipeline::new(Numbers, Square, Discard).run().unwrap();
/// assert_eq!(report.loaded, 3);
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract items from source
    /// 2. Transform each item (the transformer's before/after run even when
    ///    nothing was extracted)
    /// 3. Load items to destination
    ///
    /// # Errors
    /// Returns an error if any stage fails; later stages are not started
    pub fn run(mut self) -> Result<Report> {
        log::info!("Starting ETL pipeline");

        // Extract
        log::debug!("Extracting from source...");
        let items = self.extractor.extract()?;
        let extracted = items.len();
        log::info!("Extracted {} items", extracted);

        if items.is_empty() {
            log::warn!("No items extracted");
        }

        // Transform
        log::debug!("Transforming items...");
        let transformed = self.transformer.transform_many(items)?;
        let transformed_count = transformed.len();
        log::info!("Transformed {} items", transformed_count);

        // Load
        log::debug!("Loading to destination...");
        let loaded = self.loader.load(transformed)?;
        log::info!("Loaded {} items", loaded);

        Ok(Report {
            extracted,
            transformed: transformed_count,
            loaded,
        })
    }
}
