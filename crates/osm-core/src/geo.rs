//! Geodesy kernel: pure functions over WGS-84 coordinates in degrees.
//!
//! # Conventions
//!
//! Node coordinates travel as [`GeoPoint`] (`lat`/`lon`, f64).  Line and ring
//! functions take `[lon, lat]` pairs in GeoJSON axis order, because their
//! callers (geometry assembly, feature extraction) produce GeoJSON.
//!
//! All functions are side-effect free.  Inputs may be any finite f64; there
//! are no precision guarantees below ~1 cm.

/// Mean Earth radius in metres (WGS-84).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate in decimal degrees.
///
/// Double precision is required here: routing edge lengths are differences of
/// haversines and must be stable to roughly a centimetre.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine(self.lon, self.lat, other.lon, other.lat)
    }

    /// `[lon, lat]` pair in GeoJSON axis order.
    #[inline]
    pub fn lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Distances and bearings ────────────────────────────────────────────────────

/// Haversine great-circle distance in metres.
///
/// Uses the `atan2(√a, √(1−a))` form, which stays stable near the poles and
/// across the antimeridian where the `asin` form loses digits.  Exactly zero
/// for identical inputs; symmetric in its arguments.
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Sum of consecutive haversine segments along a line, in metres.
///
/// Zero for fewer than two points.
pub fn line_length(coords: &[[f64; 2]]) -> f64 {
    coords
        .windows(2)
        .map(|w| haversine(w[0][0], w[0][1], w[1][0], w[1][1]))
        .sum()
}

/// Ratio of path length to great-circle distance between the endpoints.
///
/// Returns 1.0 for fewer than two points and when the endpoints coincide
/// (a closed loop has no meaningful sinuosity).
pub fn sinuosity(coords: &[[f64; 2]]) -> f64 {
    if coords.len() < 2 {
        return 1.0;
    }
    let first = coords[0];
    let last = coords[coords.len() - 1];
    let straight = haversine(first[0], first[1], last[0], last[1]);
    if straight == 0.0 {
        return 1.0;
    }
    line_length(coords) / straight
}

/// Initial bearing from point 1 to point 2, degrees clockwise from true
/// north, in `[0, 360)`.
pub fn bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Bearing of a line, taken from its first point to its last.
///
/// Zero for fewer than two points.
pub fn line_bearing(coords: &[[f64; 2]]) -> f64 {
    if coords.len() < 2 {
        return 0.0;
    }
    let first = coords[0];
    let last = coords[coords.len() - 1];
    bearing(first[0], first[1], last[0], last[1])
}

// ── Ring predicates and winding ───────────────────────────────────────────────

/// Ring winding direction, per the sign of the shoelace sum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winding {
    /// Counter-clockwise — positive signed area.  GeoJSON exterior rings.
    Ccw,
    /// Clockwise — negative signed area.  GeoJSON holes.
    Cw,
}

/// Shoelace sum over raw `[lon, lat]` coordinates.
///
/// Positive means counter-clockwise.  Zero for fewer than three points.
/// The value is in degrees², useful only for its sign and for relative
/// size comparisons between rings of the same neighbourhood.
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i][0] * ring[j][1];
        area -= ring[j][0] * ring[i][1];
    }
    area / 2.0
}

/// Winding of a ring from its signed area.
#[inline]
pub fn ring_winding(ring: &[[f64; 2]]) -> Winding {
    if signed_area(ring) > 0.0 { Winding::Ccw } else { Winding::Cw }
}

/// Reverse the ring in place iff its winding disagrees with `desired`.
///
/// Idempotent: a second application with the same target is a no-op.
/// Rings of fewer than three points are left untouched.
pub fn ensure_winding(ring: &mut Vec<[f64; 2]>, desired: Winding) {
    if ring.len() < 3 {
        return;
    }
    if ring_winding(ring) != desired {
        ring.reverse();
    }
}

/// Ray-casting point-in-polygon test.
///
/// Behaviour for points exactly on an edge is unspecified; callers must not
/// rely on it.
pub fn point_in_ring(point: [f64; 2], ring: &[[f64; 2]]) -> bool {
    let (x, y) = (point[0], point[1]);
    let n = ring.len();
    let mut inside = false;

    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// `true` when `inner`'s first vertex lies inside `outer`.
///
/// Valid only for non-self-intersecting rings: one vertex inside implies the
/// whole ring is inside.
pub fn ring_contains_ring(outer: &[[f64; 2]], inner: &[[f64; 2]]) -> bool {
    match inner.first() {
        Some(&p) => point_in_ring(p, outer),
        None => false,
    }
}

// ── Supplementary measures ────────────────────────────────────────────────────

/// Approximate metric ring area in m², via the shoelace formula after a flat
/// per-ring degree-to-metre conversion (1° lat ≈ 111,320 m, longitude scaled
/// by cos of the mean latitude).  Zero for fewer than three points.
pub fn polygon_area_m2(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    const LAT_TO_M: f64 = 111_320.0;
    let avg_lat = ring.iter().map(|c| c[1]).sum::<f64>() / ring.len() as f64;
    let lon_to_m = LAT_TO_M * avg_lat.to_radians().cos().abs();

    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (x1, y1) = (ring[i][0] * lon_to_m, ring[i][1] * LAT_TO_M);
        let (x2, y2) = (ring[j][0] * lon_to_m, ring[j][1] * LAT_TO_M);
        area += x1 * y2 - x2 * y1;
    }

    area.abs() / 2.0
}

/// Arithmetic mean of the ring's vertices.  `[0, 0]` for an empty ring.
pub fn ring_centroid(ring: &[[f64; 2]]) -> [f64; 2] {
    if ring.is_empty() {
        return [0.0, 0.0];
    }
    let n = ring.len() as f64;
    let sum_lon: f64 = ring.iter().map(|c| c[0]).sum();
    let sum_lat: f64 = ring.iter().map(|c| c[1]).sum();
    [sum_lon / n, sum_lat / n]
}

/// Inclusive bounding-box containment check.
#[inline]
pub fn point_in_bbox(lat: f64, lon: f64, top: f64, left: f64, bottom: f64, right: f64) -> bool {
    bottom <= lat && lat <= top && left <= lon && lon <= right
}
