//! Coordinator mediating the map and table views
//!
//! Owns the shared state both views render from (records, filter, sort,
//! selection, viewport, hover) and exposes the command surface they call
//! into. Each command runs to completion on the UI thread and recomputes
//! the derived row order synchronously when one of its inputs changed.

use tracing::debug;

use crate::engine::{self, SortDirection, SortSpec};
use crate::place::{Place, PlaceColumn};
use crate::viewport::Viewport;

pub struct Coordinator {
    places: Vec<Place>,
    filter: String,
    sort: SortSpec,
    selection: Option<Place>,
    hovered: Option<String>,
    viewport: Viewport,

    /// Cached output of the filter/sort engine: indices into `places`.
    derived: Vec<usize>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            places: Vec::new(),
            filter: String::new(),
            sort: SortSpec::default(),
            selection: None,
            hovered: None,
            viewport: Viewport::default(),
            derived: Vec::new(),
        }
    }

    /// Install a freshly loaded dataset. The selection is kept as-is; a
    /// selected pid that no longer exists behaves like a filtered-out one.
    pub fn set_places(&mut self, places: Vec<Place>) {
        self.places = places;
        self.refresh();
    }

    /// Replace the selection unconditionally and fly the camera to the
    /// record. No check that the record is in the derived sequence; a
    /// filtered-out selection is a valid state.
    pub fn select(&mut self, place: Place) {
        debug!("place selected: {}", place.pid);
        self.viewport = Viewport::focused_on(place.longitude, place.latitude);
        self.selection = Some(place);
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter != self.filter {
            self.filter = filter;
            self.refresh();
        }
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        if sort != self.sort {
            self.sort = sort;
            self.refresh();
        }
    }

    /// Header-click policy: toggle the direction when the column is already
    /// the active key, otherwise sort by it ascending.
    pub fn sort_by(&mut self, column: PlaceColumn) {
        let direction = if self.sort.column == column {
            self.sort.direction.flipped()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(SortSpec { column, direction });
    }

    /// Camera change reported by a map gesture.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Transient hover, used only for the map tooltip.
    pub fn set_hovered(&mut self, pid: Option<String>) {
        self.hovered = pid;
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// The filtered, sorted display order as indices into [`places`].
    ///
    /// [`places`]: Self::places
    pub fn derived(&self) -> &[usize] {
        &self.derived
    }

    pub fn selection(&self) -> Option<&Place> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, pid: &str) -> bool {
        self.selection.as_ref().map_or(false, |place| place.pid == pid)
    }

    /// Position of the selected record within the derived sequence, if the
    /// current filter admits it.
    pub fn selected_row(&self) -> Option<usize> {
        let selection = self.selection.as_ref()?;
        self.derived
            .iter()
            .position(|&index| self.places[index].pid == selection.pid)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    fn refresh(&mut self) {
        self.derived = engine::derive(&self.places, &self.filter, self.sort);
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::FOCUS_ZOOM;
    use pretty_assertions::assert_eq;

    fn place(pid: &str, name: &str, longitude: f64, latitude: f64) -> Place {
        Place {
            pid: pid.to_string(),
            name: name.to_string(),
            city: "Lamar".to_string(),
            region: "CO".to_string(),
            postal_code: "81052".to_string(),
            tenant_type: None,
            longitude,
            latitude,
        }
    }

    fn loaded() -> Coordinator {
        let mut coordinator = Coordinator::new();
        coordinator.set_places(vec![
            place("1", "Alpha", 20.0, 10.0),
            place("2", "Beta", 40.0, 30.0),
        ]);
        coordinator
    }

    #[test]
    fn test_starts_empty_with_default_camera() {
        let coordinator = Coordinator::new();
        assert!(coordinator.selection().is_none());
        assert!(coordinator.derived().is_empty());
        assert_eq!(coordinator.viewport(), Viewport::default());
        assert_eq!(coordinator.sort(), SortSpec::default());
    }

    #[test]
    fn test_filtered_derived_sequence() {
        let mut coordinator = loaded();
        coordinator.set_filter("alp");
        assert_eq!(coordinator.derived(), &[0]);
        assert_eq!(coordinator.places()[coordinator.derived()[0]].pid, "1");
    }

    #[test]
    fn test_select_flies_camera_to_record() {
        let mut coordinator = loaded();
        let beta = coordinator.places()[1].clone();
        coordinator.select(beta);
        let viewport = coordinator.viewport();
        assert_eq!(viewport.longitude, 40.0);
        assert_eq!(viewport.latitude, 30.0);
        assert_eq!(viewport.zoom, FOCUS_ZOOM);
        assert_eq!(viewport.pitch, 0.0);
        assert_eq!(viewport.bearing, 0.0);
    }

    #[test]
    fn test_selection_survives_filtering_out() {
        let mut coordinator = loaded();
        let alpha = coordinator.places()[0].clone();
        coordinator.select(alpha);
        assert_eq!(coordinator.selected_row(), Some(0));

        coordinator.set_filter("beta");
        assert!(coordinator.is_selected("1"));
        assert_eq!(coordinator.selected_row(), None);

        // Readmitting the record restores the row without reselection.
        coordinator.set_filter("");
        assert!(coordinator.is_selected("1"));
        assert_eq!(coordinator.selected_row(), Some(0));
    }

    #[test]
    fn test_sort_by_toggles_active_column() {
        let mut coordinator = loaded();
        assert_eq!(coordinator.sort(), SortSpec::default());

        coordinator.sort_by(PlaceColumn::Name);
        assert_eq!(coordinator.sort().direction, SortDirection::Descending);
        assert_eq!(coordinator.derived(), &[1, 0]);

        coordinator.sort_by(PlaceColumn::Name);
        assert_eq!(coordinator.sort().direction, SortDirection::Ascending);
        assert_eq!(coordinator.derived(), &[0, 1]);

        // A different column starts ascending again.
        coordinator.sort_by(PlaceColumn::Latitude);
        assert_eq!(coordinator.sort().column, PlaceColumn::Latitude);
        assert_eq!(coordinator.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_reload_keeps_selection() {
        let mut coordinator = loaded();
        let alpha = coordinator.places()[0].clone();
        coordinator.select(alpha);
        coordinator.set_places(vec![place("2", "Beta", 40.0, 30.0)]);
        assert!(coordinator.is_selected("1"));
        assert_eq!(coordinator.selected_row(), None);
    }

    #[test]
    fn test_hover_does_not_touch_selection_or_rows() {
        let mut coordinator = loaded();
        let before = coordinator.derived().to_vec();
        coordinator.set_hovered(Some("2".to_string()));
        assert_eq!(coordinator.hovered(), Some("2"));
        assert!(coordinator.selection().is_none());
        assert_eq!(coordinator.derived(), &before[..]);
    }

    #[test]
    fn test_gesture_viewport_is_carried_verbatim() {
        let mut coordinator = loaded();
        let dragged = Viewport {
            longitude: -73.9,
            latitude: 40.7,
            zoom: 6.5,
            pitch: 0.0,
            bearing: 0.0,
        };
        coordinator.set_viewport(dragged);
        assert_eq!(coordinator.viewport(), dragged);
    }
}
