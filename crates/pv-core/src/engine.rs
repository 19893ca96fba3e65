//! Filter/sort engine
//!
//! Pure derivation of the displayed row order from the raw records plus the
//! current filter text and sort spec. The output is a sequence of indices
//! into the record slice, so callers never clone rows to reorder them.

use std::cmp::Ordering;

use crate::place::{Place, PlaceColumn};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: PlaceColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// The table opens sorted by name, ascending.
    fn default() -> Self {
        Self {
            column: PlaceColumn::Name,
            direction: SortDirection::Ascending,
        }
    }
}

/// Derive the ordered display sequence: indices of the records that pass
/// the filter, sorted by the requested column with ties broken by original
/// index.
///
/// The filter is a case-insensitive substring match against every field's
/// string form; an empty filter passes everything. The direction flips the
/// field comparison only, never the tie-break, so equal keys always keep
/// insertion order.
pub fn derive(places: &[Place], filter: &str, sort: SortSpec) -> Vec<usize> {
    let needle = filter.to_lowercase();

    let mut rows: Vec<usize> = places
        .iter()
        .enumerate()
        .filter(|(_, place)| needle.is_empty() || matches_filter(place, &needle))
        .map(|(index, _)| index)
        .collect();

    rows.sort_by(|&a, &b| {
        let ordering = compare_column(&places[a], &places[b], sort.column);
        let ordering = match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then(a.cmp(&b))
    });

    rows
}

/// True if the lowercased needle occurs in at least one field's lowercased
/// string form. The needle must already be lowercase.
fn matches_filter(place: &Place, needle: &str) -> bool {
    PlaceColumn::ALL
        .iter()
        .any(|&column| place.value_string(column).to_lowercase().contains(needle))
}

/// Compare two records on one column with the type-appropriate ordering:
/// lexicographic for text, numeric for coordinates. An absent tenant type
/// orders as the minimal value.
fn compare_column(a: &Place, b: &Place, column: PlaceColumn) -> Ordering {
    match column {
        PlaceColumn::Pid => a.pid.cmp(&b.pid),
        PlaceColumn::Name => a.name.cmp(&b.name),
        PlaceColumn::City => a.city.cmp(&b.city),
        PlaceColumn::Region => a.region.cmp(&b.region),
        PlaceColumn::PostalCode => a.postal_code.cmp(&b.postal_code),
        PlaceColumn::TenantType => a.tenant_type.cmp(&b.tenant_type),
        PlaceColumn::Longitude => a.longitude.total_cmp(&b.longitude),
        PlaceColumn::Latitude => a.latitude.total_cmp(&b.latitude),
    }
}
