//! Map camera state

use serde::{Deserialize, Serialize};

/// Zoom level applied when a selection flies the camera to a place.
pub const FOCUS_ZOOM: f64 = 10.0;

/// Map camera description: center, zoom, pitch, bearing.
///
/// A pure value; gestures and fly-to requests replace it wholesale rather
/// than mutating individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for Viewport {
    /// Initial camera: continental overview centered on North America.
    fn default() -> Self {
        Self {
            longitude: -100.0,
            latitude: 40.0,
            zoom: 3.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

impl Viewport {
    /// Camera for a selection fly-to: centered on the given coordinates at
    /// [`FOCUS_ZOOM`], with pitch and bearing reset to zero.
    pub fn focused_on(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom: FOCUS_ZOOM,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.longitude, -100.0);
        assert_eq!(viewport.latitude, 40.0);
        assert_eq!(viewport.zoom, 3.0);
        assert_eq!(viewport.pitch, 0.0);
        assert_eq!(viewport.bearing, 0.0);
    }

    #[test]
    fn test_focused_on_resets_pitch_and_bearing() {
        let viewport = Viewport::focused_on(40.0, 30.0);
        assert_eq!(viewport.longitude, 40.0);
        assert_eq!(viewport.latitude, 30.0);
        assert_eq!(viewport.zoom, FOCUS_ZOOM);
        assert_eq!(viewport.pitch, 0.0);
        assert_eq!(viewport.bearing, 0.0);
    }
}
