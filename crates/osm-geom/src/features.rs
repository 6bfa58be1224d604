//! Semantic feature extraction.
//!
//! Projects parsed elements into three feature families:
//!
//! - **amenities** — tagged nodes with a recognised `amenity` value (points)
//! - **highways** — ways with a recognised `highway` value (lines, with
//!   derived length/sinuosity/bearing properties)
//! - **buildings** — ways with a recognised `building` value (polygons,
//!   with derived area)
//!
//! Geometry always resolves through the coordinate cache, never the tagged
//! node list; a way whose geometry nodes carry no tags still gets its full
//! shape.

use osm_core::geo;
use osm_core::TagMap;
use osm_parse::{CoordCache, Node, Way};
use serde::Serialize;

use crate::categories::{
    category_contains, AMENITY_TYPES, BUILDING_TYPES, HIGHWAY_TYPES, IMPORTANT_TAGS,
};
use crate::geometry::Geometry;

/// Which family a feature belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Amenity,
    Highway,
    Building,
}

/// One extracted feature, GeoJSON-shaped.
#[derive(Clone, Debug, Serialize)]
pub struct Feature {
    /// Raw OSM element ID (node ID for amenities, way ID otherwise).
    pub id: i64,
    pub kind: FeatureKind,
    /// The category value that selected the feature (e.g. `cafe`,
    /// `residential`, `yes`).
    pub subtype: String,
    pub name: Option<String>,
    pub geometry: Geometry,
    /// Curated source tags plus derived measures, all as strings.
    pub properties: TagMap,
}

/// The three feature families of one extraction run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FeatureSet {
    pub amenities: Vec<Feature>,
    pub highways: Vec<Feature>,
    pub buildings: Vec<Feature>,
}

impl FeatureSet {
    pub fn total(&self) -> usize {
        self.amenities.len() + self.highways.len() + self.buildings.len()
    }
}

/// Extract all three feature families.
pub fn extract_features(nodes: &[Node], ways: &[Way], coords: &CoordCache) -> FeatureSet {
    FeatureSet {
        amenities: extract_amenities(nodes),
        highways: extract_highways(ways, coords),
        buildings: extract_buildings(ways, coords),
    }
}

/// Point features from tagged nodes with a recognised `amenity` value.
pub fn extract_amenities(nodes: &[Node]) -> Vec<Feature> {
    let mut features = Vec::new();
    for node in nodes {
        let Some(amenity) = node.tags.get("amenity") else {
            continue;
        };
        if !category_contains(AMENITY_TYPES, amenity) {
            continue;
        }
        features.push(Feature {
            id: node.id.raw(),
            kind: FeatureKind::Amenity,
            subtype: amenity.to_owned(),
            name: node.tags.get("name").map(str::to_owned),
            geometry: Geometry::point(node.point.lon, node.point.lat),
            properties: curated_properties(&node.tags),
        });
    }
    features
}

/// Line features from ways with a recognised `highway` value and at least
/// two resolvable coordinates.
pub fn extract_highways(ways: &[Way], coords: &CoordCache) -> Vec<Feature> {
    let mut features = Vec::new();
    for way in ways {
        let Some(highway) = way.tags.get("highway") else {
            continue;
        };
        if !category_contains(HIGHWAY_TYPES, highway) {
            continue;
        }
        let line = resolve_coords(way, coords);
        if line.len() < 2 {
            continue;
        }

        let mut properties = curated_properties(&way.tags);
        properties.insert("length_m", &format!("{:.1}", geo::line_length(&line)));
        properties.insert("sinuosity", &format!("{:.3}", geo::sinuosity(&line)));
        properties.insert("bearing", &format!("{:.1}", geo::line_bearing(&line)));

        features.push(Feature {
            id: way.id.raw(),
            kind: FeatureKind::Highway,
            subtype: highway.to_owned(),
            name: way.tags.get("name").map(str::to_owned),
            geometry: Geometry::LineString { coordinates: line },
            properties,
        });
    }
    features
}

/// Polygon features from ways with a recognised `building` value and at
/// least three resolvable coordinates.  Open rings are closed by repeating
/// the first vertex.
pub fn extract_buildings(ways: &[Way], coords: &CoordCache) -> Vec<Feature> {
    let mut features = Vec::new();
    for way in ways {
        let Some(building) = way.tags.get("building") else {
            continue;
        };
        if !category_contains(BUILDING_TYPES, building) {
            continue;
        }
        let mut ring = resolve_coords(way, coords);
        if ring.len() < 3 {
            continue;
        }
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }

        let mut properties = curated_properties(&way.tags);
        properties.insert("area_sqm", &format!("{:.2}", geo::polygon_area_m2(&ring)));
        properties.insert("node_count", &way.node_refs.len().to_string());

        features.push(Feature {
            id: way.id.raw(),
            kind: FeatureKind::Building,
            subtype: building.to_owned(),
            name: way.tags.get("name").map(str::to_owned),
            geometry: Geometry::Polygon { coordinates: vec![ring] },
            properties,
        });
    }
    features
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_coords(way: &Way, coords: &CoordCache) -> Vec<[f64; 2]> {
    way.node_refs
        .iter()
        .filter_map(|r| coords.get(r))
        .map(|p| p.lon_lat())
        .collect()
}

fn curated_properties(tags: &TagMap) -> TagMap {
    tags.iter()
        .filter(|(k, _)| IMPORTANT_TAGS.contains(k))
        .collect()
}
