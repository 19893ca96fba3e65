//! Dataset sources

pub mod csv_source;

pub use csv_source::CsvSource;

use async_trait::async_trait;

use crate::schema::PlaceTable;
use crate::DataError;

/// A loadable origin for the place dataset.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Read and validate the whole dataset.
    async fn load_places(&self) -> Result<PlaceTable, DataError>;

    /// Display name for logs and the status line.
    fn source_name(&self) -> String;
}
