//! `osm-core` — foundational types for the `rust_osm` workspace.
//!
//! This crate is a dependency of every other `osm-*` crate.  It intentionally
//! has no `osm-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`ids`]   | `NodeId`, `WayId`, `RelationId`                            |
//! | [`geo`]   | `GeoPoint`, haversine, bearings, ring predicates, winding  |
//! | [`tags`]  | `TagMap` — sorted flat key/value storage                   |
//! | [`rng`]   | `SampleRng` — seeded RNG for reproducible sampling         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ID and point types and   |
//!           | `Serialize` to `TagMap`.  Required by `osm-export`.        |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod tags;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{GeoPoint, Winding};
pub use ids::{NodeId, RelationId, WayId};
pub use rng::SampleRng;
pub use tags::TagMap;
