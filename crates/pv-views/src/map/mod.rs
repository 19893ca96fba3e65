//! Map view over the full place dataset
//!
//! Painter-based point map: Web Mercator projection about the shared
//! camera, a graticule for orientation, one marker per record. Gestures
//! report camera changes back to the coordinator, clicking a marker
//! selects its record, hovering one shows its name.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Ui};
use uuid::Uuid;

use pv_core::{Place, Viewport};

use crate::{View, ViewId, ViewerContext};

/// Pixel size of one Mercator tile at zoom zero.
const TILE_SIZE: f64 = 256.0;

/// Mercator's usable latitude bound.
const MAX_LATITUDE: f64 = 85.0511;

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 18.0;

const POINT_RADIUS: f32 = 5.0;

/// Slop around a marker that still picks it.
const PICK_RADIUS: f32 = 12.0;

/// Commands produced while the map is drawn, applied once the coordinator
/// read lock is released.
enum MapAction {
    Select(Place),
    SetViewport(Viewport),
    SetHovered(Option<String>),
}

pub struct MapView {
    id: ViewId,
    title: String,
}

impl MapView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Map".to_string(),
        }
    }

    /// Pan with drag, zoom with scroll. Returns the camera to render this
    /// frame so gestures never lag a frame behind.
    fn handle_gestures(
        &self,
        ui: &Ui,
        response: &egui::Response,
        viewport: Viewport,
        actions: &mut Vec<MapAction>,
    ) -> Viewport {
        let mut updated = viewport;

        if response.dragged() {
            let delta = response.drag_delta();
            let scale = world_pixels(updated.zoom);
            let (center_x, center_y) = mercator_normalized(updated.longitude, updated.latitude);

            let x = center_x - delta.x as f64 / scale;
            let y = (center_y - delta.y as f64 / scale).clamp(0.0, 1.0);
            let (longitude, latitude) = mercator_to_lon_lat(x, y);

            updated.longitude = wrap_longitude(longitude);
            updated.latitude = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            if scroll_delta != 0.0 {
                updated.zoom =
                    (updated.zoom + scroll_delta as f64 / 200.0).clamp(MIN_ZOOM, MAX_ZOOM);
            }
        }

        if updated != viewport {
            actions.push(MapAction::SetViewport(updated));
        }

        updated
    }

    fn draw_base_map(&self, ui: &mut Ui, rect: Rect, viewport: &Viewport) {
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, Rounding::ZERO, Color32::from_rgb(18, 22, 26));

        let step = graticule_step(viewport.zoom);
        let scale = world_pixels(viewport.zoom);
        let line_stroke = Stroke::new(0.5, Color32::from_gray(45));
        let label_color = Color32::from_gray(100);

        // Degree spans covering the screen, padded one step. The latitude
        // estimate over-covers away from the equator, which only means a
        // few extra clipped lines.
        let lon_span = rect.width() as f64 / scale * 360.0 + step;
        let lat_span = rect.height() as f64 / scale * 360.0 + step;

        let mut lon = ((viewport.longitude - lon_span / 2.0) / step).floor() * step;
        while lon <= viewport.longitude + lon_span / 2.0 {
            let start = project(viewport, &rect, lon, MAX_LATITUDE);
            let end = project(viewport, &rect, lon, -MAX_LATITUDE);
            painter.line_segment([start, end], line_stroke);
            painter.text(
                Pos2::new(start.x, rect.bottom() - 5.0),
                Align2::CENTER_BOTTOM,
                format_degrees(wrap_longitude(lon), step),
                FontId::proportional(10.0),
                label_color,
            );
            lon += step;
        }

        let south = (viewport.latitude - lat_span / 2.0).max(-80.0);
        let north = (viewport.latitude + lat_span / 2.0).min(80.0);
        let mut lat = (south / step).floor() * step;
        while lat <= north {
            let start = project(viewport, &rect, viewport.longitude - lon_span / 2.0, lat);
            let end = project(viewport, &rect, viewport.longitude + lon_span / 2.0, lat);
            painter.line_segment([start, end], line_stroke);
            painter.text(
                Pos2::new(rect.left() + 5.0, (start.y + end.y) / 2.0),
                Align2::LEFT_CENTER,
                format_degrees(lat, step),
                FontId::proportional(10.0),
                label_color,
            );
            lat += step;
        }
    }

    fn draw_places(
        &self,
        ui: &mut Ui,
        rect: Rect,
        viewport: &Viewport,
        places: &[Place],
        selected_pid: Option<&str>,
    ) {
        let painter = ui.painter_at(rect);
        let bounds = rect.expand(POINT_RADIUS);

        for place in places {
            let pos = project(viewport, &rect, place.longitude, place.latitude);
            if !bounds.contains(pos) {
                continue;
            }

            let selected = selected_pid == Some(place.pid.as_str());
            painter.circle_filled(pos, POINT_RADIUS, marker_color(selected));
            painter.circle_stroke(pos, POINT_RADIUS, Stroke::new(1.0, Color32::WHITE));
        }

        // The selected marker is painted again on top so a dense cluster
        // cannot cover it.
        if let Some(pid) = selected_pid {
            if let Some(place) = places.iter().find(|place| place.pid == pid) {
                let pos = project(viewport, &rect, place.longitude, place.latitude);
                if bounds.contains(pos) {
                    painter.circle_filled(pos, POINT_RADIUS, marker_color(true));
                    painter.circle_stroke(pos, POINT_RADIUS, Stroke::new(1.0, Color32::WHITE));
                }
            }
        }
    }

    fn draw_status(&self, ui: &mut Ui, rect: Rect, viewport: &Viewport) {
        let painter = ui.painter_at(rect);
        painter.text(
            Pos2::new(rect.left() + 6.0, rect.bottom() - 18.0),
            Align2::LEFT_BOTTOM,
            format!(
                "Center: {:.2}, {:.2}  Zoom: {:.1}",
                viewport.latitude, viewport.longitude, viewport.zoom
            ),
            FontId::proportional(10.0),
            Color32::from_gray(140),
        );
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MapView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let mut actions: Vec<MapAction> = Vec::new();

        {
            let coordinator = ctx.coordinator.read();
            let places = coordinator.places();
            let selected_pid = coordinator.selection().map(|place| place.pid.clone());

            let rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(rect, Sense::click_and_drag());

            let viewport =
                self.handle_gestures(ui, &response, coordinator.viewport(), &mut actions);

            self.draw_base_map(ui, rect, &viewport);
            self.draw_places(ui, rect, &viewport, places, selected_pid.as_deref());
            self.draw_status(ui, rect, &viewport);

            let picked = response
                .hover_pos()
                .and_then(|pointer| pick_place(&viewport, &rect, places, pointer));

            let hovered_pid = picked.map(|place| place.pid.clone());
            if hovered_pid.as_deref() != coordinator.hovered() {
                actions.push(MapAction::SetHovered(hovered_pid));
            }

            if let Some(place) = picked {
                if response.clicked() {
                    actions.push(MapAction::Select(place.clone()));
                }
                let name = place.name.clone();
                response.on_hover_text(name);
            }
        }

        if !actions.is_empty() {
            let mut coordinator = ctx.coordinator.write();
            for action in actions {
                match action {
                    MapAction::Select(place) => coordinator.select(place),
                    MapAction::SetViewport(viewport) => coordinator.set_viewport(viewport),
                    MapAction::SetHovered(pid) => coordinator.set_hovered(pid),
                }
            }
        }
    }
}

fn marker_color(selected: bool) -> Color32 {
    if selected {
        Color32::from_rgba_unmultiplied(0, 255, 0, 200)
    } else {
        Color32::from_rgba_unmultiplied(255, 0, 0, 200)
    }
}

/// Normalized Web Mercator coordinates in `[0, 1]`.
fn mercator_normalized(longitude: f64, latitude: f64) -> (f64, f64) {
    let x = (longitude + 180.0) / 360.0;
    let lat_rad = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y = 0.5 - (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() / (2.0 * std::f64::consts::PI);
    (x, y)
}

/// Inverse of [`mercator_normalized`].
fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let longitude = x * 360.0 - 180.0;
    let latitude = (std::f64::consts::PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (longitude, latitude)
}

/// Pixel span of the whole world at this zoom.
fn world_pixels(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Project a coordinate to screen space for the given camera and rect.
fn project(viewport: &Viewport, rect: &Rect, longitude: f64, latitude: f64) -> Pos2 {
    let scale = world_pixels(viewport.zoom);
    let (x, y) = mercator_normalized(longitude, latitude);
    let (center_x, center_y) = mercator_normalized(viewport.longitude, viewport.latitude);

    Pos2::new(
        rect.center().x + ((x - center_x) * scale) as f32,
        rect.center().y + ((y - center_y) * scale) as f32,
    )
}

/// Nearest marker within [`PICK_RADIUS`] of the pointer, if any.
fn pick_place<'a>(
    viewport: &Viewport,
    rect: &Rect,
    places: &'a [Place],
    pointer: Pos2,
) -> Option<&'a Place> {
    let mut nearest = None;
    let mut min_dist = f32::INFINITY;

    for place in places {
        let pos = project(viewport, rect, place.longitude, place.latitude);
        let dist = (pos - pointer).length();
        if dist < min_dist && dist < PICK_RADIUS {
            min_dist = dist;
            nearest = Some(place);
        }
    }

    nearest
}

fn graticule_step(zoom: f64) -> f64 {
    if zoom < 4.0 {
        30.0
    } else if zoom < 6.0 {
        10.0
    } else if zoom < 8.0 {
        5.0
    } else if zoom < 10.0 {
        1.0
    } else if zoom < 13.0 {
        0.5
    } else {
        0.1
    }
}

fn format_degrees(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{}°", value.round() as i64)
    } else {
        format!("{:.1}°", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    fn place(pid: &str, name: &str, longitude: f64, latitude: f64) -> Place {
        Place {
            pid: pid.to_string(),
            name: name.to_string(),
            city: "Denver".to_string(),
            region: "CO".to_string(),
            postal_code: "80014".to_string(),
            tenant_type: Some("retail".to_string()),
            longitude,
            latitude,
        }
    }

    fn test_rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::splat(400.0))
    }

    #[test]
    fn test_camera_center_projects_to_rect_center() {
        let viewport = Viewport {
            longitude: -104.9,
            latitude: 39.7,
            zoom: 10.0,
            pitch: 0.0,
            bearing: 0.0,
        };
        let rect = test_rect();

        let pos = project(&viewport, &rect, -104.9, 39.7);
        assert!((pos.x - rect.center().x).abs() < 0.001);
        assert!((pos.y - rect.center().y).abs() < 0.001);
    }

    #[test]
    fn test_mercator_roundtrip() {
        for &(longitude, latitude) in &[(0.0, 0.0), (-104.9, 39.7), (151.2, -33.9)] {
            let (x, y) = mercator_normalized(longitude, latitude);
            let (back_lon, back_lat) = mercator_to_lon_lat(x, y);
            assert!((back_lon - longitude).abs() < 1e-9);
            assert!((back_lat - latitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zooming_in_spreads_points_apart() {
        let mut viewport = Viewport::default();
        let rect = test_rect();

        let near = project(&viewport, &rect, viewport.longitude + 1.0, viewport.latitude);
        let spread_before = near.x - rect.center().x;

        viewport.zoom += 1.0;
        let near = project(&viewport, &rect, viewport.longitude + 1.0, viewport.latitude);
        let spread_after = near.x - rect.center().x;

        assert!((spread_after - spread_before * 2.0).abs() < 0.01);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(-185.0), 175.0);
        assert_eq!(wrap_longitude(185.0), -175.0);
        assert_eq!(wrap_longitude(0.0), 0.0);
        assert_eq!(wrap_longitude(-180.0), -180.0);
    }

    #[test]
    fn test_pick_prefers_the_nearest_marker_within_radius() {
        let viewport = Viewport {
            longitude: 0.0,
            latitude: 0.0,
            zoom: 3.0,
            pitch: 0.0,
            bearing: 0.0,
        };
        let rect = test_rect();
        let places = vec![place("1", "Origin", 0.0, 0.0), place("2", "East", 90.0, 0.0)];

        let on_origin = project(&viewport, &rect, 0.0, 0.0);
        let picked = pick_place(&viewport, &rect, &places, on_origin);
        assert_eq!(picked.map(|p| p.pid.as_str()), Some("1"));

        let nowhere = Pos2::new(on_origin.x, on_origin.y - 100.0);
        assert!(pick_place(&viewport, &rect, &places, nowhere).is_none());
    }
}
