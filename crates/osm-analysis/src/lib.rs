//! `osm-analysis` — whole-network topology analytics.
//!
//! Everything here works on an **undirected view** of the routing graph:
//! `u` and `v` are neighbours when an edge exists in either direction, and
//! parallel edges collapse into one neighbour relation.  Results are
//! deterministic: node iteration is ID-ordered and the sampling analytics
//! take explicit seeds.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`view`]       | `UndirectedView` shared by every analytic             |
//! | [`components`] | Connected components, dead ends, intersections        |
//! | [`cut`]        | Bridges and articulation points (removal diff)        |
//! | [`centrality`] | Sampled betweenness centrality                        |
//! | [`detour`]     | Detour factor over random node pairs                  |

pub mod centrality;
pub mod components;
pub mod cut;
pub mod detour;
pub mod view;

#[cfg(test)]
mod tests;

pub use centrality::{betweenness_centrality, CentralityScores};
pub use components::{components, dead_ends, is_connected, ComponentReport, network_report};
pub use cut::{articulation_points, bridges};
pub use detour::{detour_factor, DetourStats};
pub use view::UndirectedView;
