//! Strict schema validation for the place dataset
//!
//! The header row must carry every required column; a missing column is
//! fatal. Each data row is then validated into a typed [`Place`] or
//! rejected with a per-row diagnostic. Rejected rows never abort the load.

use std::ops::RangeInclusive;

use csv::StringRecord;
use tracing::warn;

use pv_core::Place;

use crate::DataError;

/// Columns the header row must contain, by exact (trimmed) name.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "pid",
    "name",
    "city",
    "region",
    "postal_code",
    "tenant_type",
    "longitude",
    "latitude",
];

const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;
const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// A fully validated dataset plus the rows it rejected.
#[derive(Debug, Clone, Default)]
pub struct PlaceTable {
    pub places: Vec<Place>,
    pub diagnostics: Vec<RowDiagnostic>,
    pub source_name: String,
}

/// Why one data row was rejected. `row` counts data rows from 1, not
/// counting the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub row: usize,
    pub column: String,
    pub message: String,
}

impl RowDiagnostic {
    fn new(row: usize, column: &str, message: String) -> Self {
        Self {
            row,
            column: column.to_string(),
            message,
        }
    }
}

/// Resolved positions of the required columns within the header row.
struct ColumnIndices {
    pid: usize,
    name: usize,
    city: usize,
    region: usize,
    postal_code: usize,
    tenant_type: usize,
    longitude: usize,
    latitude: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord) -> Result<Self, DataError> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or(DataError::MissingColumn(name))
        };

        Ok(Self {
            pid: position("pid")?,
            name: position("name")?,
            city: position("city")?,
            region: position("region")?,
            postal_code: position("postal_code")?,
            tenant_type: position("tenant_type")?,
            longitude: position("longitude")?,
            latitude: position("latitude")?,
        })
    }
}

/// Read and validate every row from a CSV reader. The reader should be
/// flexible so that short rows reach the per-row validation instead of
/// aborting the read.
pub fn parse_table<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    source_name: &str,
) -> Result<PlaceTable, DataError> {
    let headers = reader.headers()?.clone();
    let indices = ColumnIndices::resolve(&headers)?;

    let mut places = Vec::new();
    let mut diagnostics = Vec::new();

    for (offset, result) in reader.records().enumerate() {
        let row = offset + 1;
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!("skipping unreadable row {}: {}", row, error);
                diagnostics.push(RowDiagnostic::new(row, "", error.to_string()));
                continue;
            }
        };

        match parse_row(&indices, &record, row) {
            Ok(place) => places.push(place),
            Err(diagnostic) => {
                warn!(
                    "skipping row {} ({}): {}",
                    diagnostic.row, diagnostic.column, diagnostic.message
                );
                diagnostics.push(diagnostic);
            }
        }
    }

    Ok(PlaceTable {
        places,
        diagnostics,
        source_name: source_name.to_string(),
    })
}

fn parse_row(
    indices: &ColumnIndices,
    record: &StringRecord,
    row: usize,
) -> Result<Place, RowDiagnostic> {
    let field = |index: usize, column: &'static str| {
        record
            .get(index)
            .ok_or_else(|| RowDiagnostic::new(row, column, "missing value".to_string()))
    };

    let pid = field(indices.pid, "pid")?.to_string();
    if pid.is_empty() {
        return Err(RowDiagnostic::new(row, "pid", "empty pid".to_string()));
    }

    let longitude = parse_coordinate(
        field(indices.longitude, "longitude")?,
        "longitude",
        LONGITUDE_RANGE,
        row,
    )?;
    let latitude = parse_coordinate(
        field(indices.latitude, "latitude")?,
        "latitude",
        LATITUDE_RANGE,
        row,
    )?;

    let tenant_type = {
        let value = field(indices.tenant_type, "tenant_type")?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    Ok(Place {
        pid,
        name: field(indices.name, "name")?.to_string(),
        city: field(indices.city, "city")?.to_string(),
        region: field(indices.region, "region")?.to_string(),
        postal_code: field(indices.postal_code, "postal_code")?.to_string(),
        tenant_type,
        longitude,
        latitude,
    })
}

fn parse_coordinate(
    text: &str,
    column: &'static str,
    range: RangeInclusive<f64>,
    row: usize,
) -> Result<f64, RowDiagnostic> {
    let value: f64 = text.trim().parse().map_err(|_| {
        RowDiagnostic::new(row, column, format!("invalid {} value '{}'", column, text))
    })?;

    if !value.is_finite() || !range.contains(&value) {
        return Err(RowDiagnostic::new(
            row,
            column,
            format!("{} {} out of range", column, value),
        ));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "pid,name,city,region,postal_code,tenant_type,longitude,latitude";

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes())
    }

    fn parse(rows: &str) -> PlaceTable {
        let data = format!("{}\n{}", HEADER, rows);
        parse_table(&mut reader(&data), "test.csv").unwrap()
    }

    #[test]
    fn test_valid_rows_become_typed_places() {
        let table = parse("1,Alpha,Lamar,CO,81052,retail,20.0,10.0\n2,Beta,Holly,CO,81047,,40.0,30.0\n");
        assert_eq!(table.places.len(), 2);
        assert!(table.diagnostics.is_empty());

        let alpha = &table.places[0];
        assert_eq!(alpha.pid, "1");
        assert_eq!(alpha.name, "Alpha");
        assert_eq!(alpha.tenant_type.as_deref(), Some("retail"));
        assert_eq!(alpha.longitude, 20.0);
        assert_eq!(alpha.latitude, 10.0);

        // Empty tenant type is an absent value, not an empty string.
        assert_eq!(table.places[1].tenant_type, None);
    }

    #[test]
    fn test_malformed_coordinate_rejects_row_not_load() {
        let table = parse("1,Alpha,Lamar,CO,81052,retail,not-a-number,10.0\n2,Beta,Holly,CO,81047,retail,40.0,30.0\n");
        assert_eq!(table.places.len(), 1);
        assert_eq!(table.places[0].pid, "2");
        assert_eq!(table.diagnostics.len(), 1);
        assert_eq!(table.diagnostics[0].row, 1);
        assert_eq!(table.diagnostics[0].column, "longitude");
    }

    #[test]
    fn test_out_of_range_coordinate_is_rejected() {
        let table = parse("1,Alpha,Lamar,CO,81052,retail,20.0,95.0\n");
        assert!(table.places.is_empty());
        assert_eq!(table.diagnostics[0].column, "latitude");
    }

    #[test]
    fn test_short_row_is_rejected_with_diagnostic() {
        let table = parse("1,Alpha,Lamar\n2,Beta,Holly,CO,81047,retail,40.0,30.0\n");
        assert_eq!(table.places.len(), 1);
        assert_eq!(table.diagnostics.len(), 1);
        assert_eq!(table.diagnostics[0].row, 1);
    }

    #[test]
    fn test_empty_pid_is_rejected() {
        let table = parse(",Alpha,Lamar,CO,81052,retail,20.0,10.0\n");
        assert!(table.places.is_empty());
        assert_eq!(table.diagnostics[0].column, "pid");
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let data = "pid,name,city,region,postal_code,tenant_type,longitude\n1,Alpha,Lamar,CO,81052,retail,20.0\n";
        let result = parse_table(&mut reader(data), "test.csv");
        match result {
            Err(DataError::MissingColumn(column)) => assert_eq!(column, "latitude"),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_file_is_an_empty_dataset() {
        let table = parse("");
        assert!(table.places.is_empty());
        assert!(table.diagnostics.is_empty());
    }

    #[test]
    fn test_extra_columns_and_padded_headers_are_tolerated() {
        let data = "pid , name ,city,region,postal_code,tenant_type,longitude,latitude,notes\n1,Alpha,Lamar,CO,81052,retail,20.0,10.0,ignored\n";
        let table = parse_table(&mut reader(data), "test.csv").unwrap();
        assert_eq!(table.places.len(), 1);
        assert_eq!(table.places[0].name, "Alpha");
    }
}
