//! CSV output backend.
//!
//! Two tables: one row per extracted feature, and a long-format distance
//! matrix (`from`, `to`, `distance_m`, `time_s`) with empty cells for
//! unreachable pairs.

use std::io::Write;

use csv::Writer;
use osm_geom::{Feature, FeatureSet};
use osm_routing::DistanceMatrix;

use crate::error::ExportResult;

/// Write all features of a set as one table, amenities first, then
/// highways, then buildings.
pub fn write_features<W: Write>(writer: W, set: &FeatureSet) -> ExportResult<()> {
    let mut out = Writer::from_writer(writer);
    out.write_record([
        "osm_id",
        "kind",
        "subtype",
        "name",
        "geometry",
        "length_m",
        "area_sqm",
    ])?;

    for feature in set.amenities.iter().chain(&set.highways).chain(&set.buildings) {
        write_feature_row(&mut out, feature)?;
    }
    out.flush()?;
    Ok(())
}

fn write_feature_row<W: Write>(out: &mut Writer<W>, feature: &Feature) -> ExportResult<()> {
    let kind = match feature.kind {
        osm_geom::FeatureKind::Amenity => "amenity",
        osm_geom::FeatureKind::Highway => "highway",
        osm_geom::FeatureKind::Building => "building",
    };
    out.write_record([
        feature.id.to_string().as_str(),
        kind,
        &feature.subtype,
        feature.name.as_deref().unwrap_or(""),
        feature.geometry.type_name(),
        feature.properties.get("length_m").unwrap_or(""),
        feature.properties.get("area_sqm").unwrap_or(""),
    ])?;
    Ok(())
}

/// Write a distance matrix in long format.  Unreachable pairs leave the
/// measure columns empty.
pub fn write_matrix<W: Write>(writer: W, matrix: &DistanceMatrix) -> ExportResult<()> {
    let mut out = Writer::from_writer(writer);
    out.write_record(["from", "to", "distance_m", "time_s"])?;

    for (i, source) in matrix.sources.iter().enumerate() {
        for (j, target) in matrix.targets.iter().enumerate() {
            match matrix.entries[i][j] {
                Some(entry) => out.write_record([
                    source.raw().to_string(),
                    target.raw().to_string(),
                    format!("{:.1}", entry.distance_m),
                    format!("{:.1}", entry.time_s),
                ])?,
                None => out.write_record([
                    source.raw().to_string(),
                    target.raw().to_string(),
                    String::new(),
                    String::new(),
                ])?,
            }
        }
    }
    out.flush()?;
    Ok(())
}
