//! Place records and their column set

use serde::{Deserialize, Serialize};

/// A single place from the loaded dataset.
///
/// `pid` is the unique key. Uniqueness is assumed rather than enforced;
/// duplicate pids make the selection highlight ambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub pid: String,
    pub name: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub tenant_type: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
}

impl Place {
    /// String form of one field, as used by the filter predicate and the
    /// table cells. An absent tenant type renders as the empty string.
    pub fn value_string(&self, column: PlaceColumn) -> String {
        match column {
            PlaceColumn::Pid => self.pid.clone(),
            PlaceColumn::Name => self.name.clone(),
            PlaceColumn::City => self.city.clone(),
            PlaceColumn::Region => self.region.clone(),
            PlaceColumn::PostalCode => self.postal_code.clone(),
            PlaceColumn::TenantType => self.tenant_type.clone().unwrap_or_default(),
            PlaceColumn::Longitude => self.longitude.to_string(),
            PlaceColumn::Latitude => self.latitude.to_string(),
        }
    }
}

/// The fields of a [`Place`], usable as filter domain and sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceColumn {
    Pid,
    Name,
    City,
    Region,
    PostalCode,
    TenantType,
    Longitude,
    Latitude,
}

impl PlaceColumn {
    /// Every field, in record order. The filter matches against all of
    /// these, whether or not they are shown in the table.
    pub const ALL: [PlaceColumn; 8] = [
        PlaceColumn::Pid,
        PlaceColumn::Name,
        PlaceColumn::City,
        PlaceColumn::Region,
        PlaceColumn::PostalCode,
        PlaceColumn::TenantType,
        PlaceColumn::Longitude,
        PlaceColumn::Latitude,
    ];

    /// The table's column set, in display order. Tenant type is parsed and
    /// filterable but has no table column.
    pub const TABLE: [PlaceColumn; 7] = [
        PlaceColumn::Pid,
        PlaceColumn::Name,
        PlaceColumn::City,
        PlaceColumn::Region,
        PlaceColumn::PostalCode,
        PlaceColumn::Latitude,
        PlaceColumn::Longitude,
    ];

    /// Stable key for persistence, matching the dataset's header names.
    pub fn key(&self) -> &'static str {
        match self {
            PlaceColumn::Pid => "pid",
            PlaceColumn::Name => "name",
            PlaceColumn::City => "city",
            PlaceColumn::Region => "region",
            PlaceColumn::PostalCode => "postal_code",
            PlaceColumn::TenantType => "tenant_type",
            PlaceColumn::Longitude => "longitude",
            PlaceColumn::Latitude => "latitude",
        }
    }

    /// Header label shown in the table.
    pub fn label(&self) -> &'static str {
        match self {
            PlaceColumn::Pid => "PID",
            PlaceColumn::Name => "Name",
            PlaceColumn::City => "City",
            PlaceColumn::Region => "Region",
            PlaceColumn::PostalCode => "Postal Code",
            PlaceColumn::TenantType => "Tenant Type",
            PlaceColumn::Longitude => "Longitude",
            PlaceColumn::Latitude => "Latitude",
        }
    }
}
