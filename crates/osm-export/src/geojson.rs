//! GeoJSON `FeatureCollection` builders.
//!
//! Everything renders to `serde_json::Value` so callers can merge, inspect,
//! or stream the result; `write_collection` handles the common
//! write-to-file case.

use std::io::Write;

use osm_analysis::CentralityScores;
use osm_geom::{Feature, FeatureSet};
use osm_parse::CoordCache;
use osm_routing::Path;
use serde_json::{json, Map, Value};

use crate::error::ExportResult;

/// Route colour palette, cycled over alternatives.
const ROUTE_COLORS: [&str; 5] = ["#0066FF", "#FF6600", "#00CC00", "#CC00CC", "#CCCC00"];

/// One extracted feature as a GeoJSON `Feature` value.
pub fn feature_value(feature: &Feature) -> Value {
    let mut properties = Map::new();
    properties.insert("id".into(), json!(feature.id));
    properties.insert("kind".into(), json!(feature.kind));
    properties.insert("subtype".into(), json!(feature.subtype));
    if let Some(name) = &feature.name {
        properties.insert("name".into(), json!(name));
    }
    for (key, value) in feature.properties.iter() {
        properties.entry(key.to_owned()).or_insert_with(|| json!(value));
    }

    json!({
        "type": "Feature",
        "geometry": feature.geometry,
        "properties": Value::Object(properties),
    })
}

/// A whole `FeatureSet` as one `FeatureCollection`, amenities first, then
/// highways, then buildings.
pub fn feature_collection(set: &FeatureSet) -> Value {
    let features: Vec<Value> = set
        .amenities
        .iter()
        .chain(&set.highways)
        .chain(&set.buildings)
        .map(feature_value)
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// A single route as a `FeatureCollection`: the line plus origin and
/// destination points.
pub fn route_collection(path: &Path, coords: &CoordCache) -> Value {
    let line = path_coordinates(path, coords);
    let mut features = vec![json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": line },
        "properties": {
            "distance_m": round1(path.distance_m),
            "time_s": round1(path.time_s),
            "nodes": path.nodes.len(),
        },
    })];
    features.extend(endpoint_features(path, coords));
    json!({ "type": "FeatureCollection", "features": features })
}

/// Alternative routes as one `FeatureCollection`, each line carrying a
/// palette colour and its rank.
pub fn alternatives_collection(routes: &[Path], coords: &CoordCache) -> Value {
    let mut features: Vec<Value> = routes
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let route_type = if i == 0 { "fastest".to_owned() } else { format!("alternative {i}") };
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": path_coordinates(path, coords),
                },
                "properties": {
                    "route_type": route_type,
                    "distance_m": round1(path.distance_m),
                    "time_s": round1(path.time_s),
                    "color": ROUTE_COLORS[i % ROUTE_COLORS.len()],
                },
            })
        })
        .collect();
    if let Some(first) = routes.first() {
        features.extend(endpoint_features(first, coords));
    }
    json!({ "type": "FeatureCollection", "features": features })
}

/// The top `top` centrality-ranked nodes as point features.
pub fn centrality_collection(
    scores: &CentralityScores,
    coords: &CoordCache,
    top: usize,
) -> Value {
    let features: Vec<Value> = scores
        .ranked
        .iter()
        .take(top)
        .enumerate()
        .filter_map(|(i, (node, score))| {
            let point = coords.get(node)?;
            Some(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [point.lon, point.lat] },
                "properties": {
                    "rank": i + 1,
                    "node_id": node.raw(),
                    "centrality": score,
                },
            }))
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Pretty-print a collection to a writer.
///
/// # Errors
///
/// I/O and serialisation failures surface as [`crate::ExportError`].
pub fn write_collection<W: Write>(mut writer: W, collection: &Value) -> ExportResult<()> {
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.write_all(b"\n")?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn path_coordinates(path: &Path, coords: &CoordCache) -> Vec<[f64; 2]> {
    path.nodes
        .iter()
        .filter_map(|n| coords.get(n))
        .map(|p| p.lon_lat())
        .collect()
}

fn endpoint_features(path: &Path, coords: &CoordCache) -> Vec<Value> {
    let mut features = Vec::new();
    let mut push = |node, label: &str| {
        if let Some(p) = coords.get(node) {
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [p.lon, p.lat] },
                "properties": { "type": label },
            }));
        }
    };
    if let Some(first) = path.nodes.first() {
        push(first, "origin");
    }
    if let Some(last) = path.nodes.last() {
        push(last, "destination");
    }
    features
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
