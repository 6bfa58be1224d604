//! `osm-geom` — geometry assembly and semantic feature extraction.
//!
//! Turns raw elements into GeoJSON-shaped values: multipolygon relations
//! into `Polygon`/`MultiPolygon` geometries with RFC 7946 winding, and
//! tagged elements into point/line/polygon features.
//!
//! # Crate layout
//!
//! | Module           | Contents                                            |
//! |------------------|-----------------------------------------------------|
//! | [`geometry`]     | `Geometry` — GeoJSON geometry enum                  |
//! | [`multipolygon`] | `MultipolygonAssembler`, ring splicing, holes       |
//! | [`features`]     | `Feature`, `FeatureSet`, `extract_features`         |
//! | [`categories`]   | Recognised amenity/highway/building value sets      |

pub mod categories;
pub mod features;
pub mod geometry;
pub mod multipolygon;

#[cfg(test)]
mod tests;

pub use features::{extract_features, Feature, FeatureKind, FeatureSet};
pub use geometry::Geometry;
pub use multipolygon::{assemble_multipolygon, AssemblyStats, MultipolygonAssembler};
