//! `osm-routing` — directed road graph construction and shortest-path
//! queries.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`mode`]     | `TravelMode`, `CostMetric`, speed tables, `maxspeed`    |
//! | [`graph`]    | `RoutingGraph`, `EdgeAttrs`, `build_routing_graph`      |
//! | [`dijkstra`] | `shortest`, `shortest_to_any`, penalties, cancellation  |
//! | [`paths`]    | Directions, k-alternatives, waypoints, distance matrix  |
//!
//! # Oneway semantics
//!
//! `oneway=yes|1|true` emits only the forward edge, `oneway=-1` emits only
//! the reverse edge, anything else is bidirectional — and only for
//! [`TravelMode::Drive`].  Walk and bike graphs ignore `oneway` entirely and
//! are symmetric by construction.

pub mod dijkstra;
pub mod graph;
pub mod mode;
pub mod paths;


pub use dijkstra::{shortest, shortest_to_any, shortest_with, CancelFlag, Path, PenaltyMap};
pub use graph::{build_routing_graph, Edge, EdgeAttrs, RoutingGraph};
pub use mode::{parse_maxspeed, CostMetric, TravelMode};
pub use paths::{
    alternatives, directions, distance_matrix, route_via, DistanceMatrix, Instruction, MatrixEntry,
};
