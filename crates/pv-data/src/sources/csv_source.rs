//! CSV place source

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use async_trait::async_trait;
use csv::ReaderBuilder;

use crate::schema::{self, PlaceTable};
use crate::sources::PlaceSource;
use crate::DataError;

/// Loads and validates places from a local CSV file.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl PlaceSource for CsvSource {
    async fn load_places(&self) -> Result<PlaceTable, DataError> {
        let path = self.path.clone();
        let source_name = self.source_name();

        // File IO stays off the UI thread.
        tokio::task::spawn_blocking(move || {
            let file = File::open(&path)?;
            // flexible: a short row becomes a per-row diagnostic instead of
            // aborting the whole read.
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(BufReader::new(file));

            schema::parse_table(&mut reader, &source_name)
        })
        .await?
    }

    fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "pid,name,city,region,postal_code,tenant_type,longitude,latitude\n";

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.csv");
        std::fs::write(
            &path,
            format!("{}1,Alpha,Lamar,CO,81052,retail,20.0,10.0\n", HEADER),
        )
        .unwrap();

        let source = CsvSource::new(path);
        let table = source.load_places().await.unwrap();
        assert_eq!(table.places.len(), 1);
        assert_eq!(table.source_name, "places.csv");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let source = CsvSource::new(PathBuf::from("does/not/exist.csv"));
        match source.load_places().await {
            Err(DataError::Io(_)) => {}
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
