//! Data loading and validation for the places viewer

pub mod loader;
pub mod schema;
pub mod sources;

// Re-exports
pub use loader::{DatasetLoader, LoadState};
pub use schema::{PlaceTable, RowDiagnostic, REQUIRED_COLUMNS};
pub use sources::{CsvSource, PlaceSource};

use thiserror::Error;
use tokio::task::JoinError;

/// Errors that abort a dataset load. Per-row defects are not errors; they
/// become [`RowDiagnostic`] entries on the loaded table instead.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("missing required column '{0}' in header")]
    MissingColumn(&'static str),

    #[error("join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
