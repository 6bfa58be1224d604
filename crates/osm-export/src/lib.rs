//! `osm-export` — interchange-format rendering of query results.
//!
//! Thin consumers only: these modules shape core results into GeoJSON
//! values and CSV tables and write them out.  No domain logic lives here.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`geojson`] | `FeatureCollection` builders for features, routes,       |
//! |             | alternatives, and centrality rankings                    |
//! | [`csv`]     | Tabular writers for features and distance matrices       |
//! | [`error`]   | `ExportError`, `ExportResult<T>`                         |

pub mod csv;
pub mod error;
pub mod geojson;

#[cfg(test)]
mod tests;

pub use error::{ExportError, ExportResult};
