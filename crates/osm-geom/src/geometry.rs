//! GeoJSON geometry model.
//!
//! Coordinates are `[lon, lat]` pairs, GeoJSON axis order.  The enum
//! serializes directly to the RFC 7946 wire shape:
//!
//! ```json
//! {"type": "Polygon", "coordinates": [[[0.0, 0.0], ...]]}
//! ```

use serde::Serialize;

/// A GeoJSON geometry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    /// First ring is the exterior (CCW), the rest are holes (CW).
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point { coordinates: [lon, lat] }
    }

    /// Name of the GeoJSON type, as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }
}
