//! Directed routing graph built from ways and the coordinate cache.
//!
//! The graph is a per-query structure: build, query, drop.  Edge labels
//! (street name, highway class) are copied into the edges so queries never
//! reach back into the element store.
//!
//! Parallel edges and self-loops are kept as-is; the shortest-path engine
//! simply relaxes them all and the cheapest wins.

use osm_core::{geo, GeoPoint, NodeId};
use osm_parse::{CoordCache, Way};
use rustc_hash::FxHashMap;

use crate::mode::{parse_maxspeed, CostMetric, TravelMode};

/// Metadata carried by every directed edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    pub distance_m: f64,
    pub travel_time_s: f64,
    /// `name` tag of the source way; empty when unnamed.
    pub name: Box<str>,
    /// `highway` tag of the source way.
    pub highway: Box<str>,
}

/// One directed edge.
#[derive(Clone, Debug)]
pub struct Edge {
    pub to: NodeId,
    pub attrs: EdgeAttrs,
}

/// Directed adjacency-list road graph for one mode and metric.
#[derive(Debug)]
pub struct RoutingGraph {
    adj: FxHashMap<NodeId, Vec<Edge>>,
    mode: TravelMode,
    metric: CostMetric,
    edge_count: usize,
}

impl RoutingGraph {
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn metric(&self) -> CostMetric {
        self.metric
    }

    /// Number of nodes that participate in at least one routable way
    /// (including oneway targets with no outgoing edges).
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.adj.contains_key(&node)
    }

    /// Outgoing edges of `node`; empty for unknown nodes.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        self.adj.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Iterate all graph nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adj.keys().copied()
    }

    /// The cost of an edge under this graph's metric.
    #[inline]
    pub fn edge_cost(&self, attrs: &EdgeAttrs) -> f64 {
        match self.metric {
            CostMetric::Time => attrs.travel_time_s,
            CostMetric::Distance => attrs.distance_m,
        }
    }

    /// Cheapest directed edge `from → to` under the graph metric, if any.
    /// Resolves parallel edges the same way the search engine does.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&EdgeAttrs> {
        self.neighbors(from)
            .iter()
            .filter(|e| e.to == to)
            .min_by(|a, b| self.edge_cost(&a.attrs).total_cmp(&self.edge_cost(&b.attrs)))
            .map(|e| &e.attrs)
    }

    /// Snap a coordinate to the nearest graph node by linear haversine scan.
    /// Returns the node and its distance in metres.  `None` only when the
    /// graph is empty or no graph node has a cached coordinate.
    pub fn nearest_node(&self, point: GeoPoint, coords: &CoordCache) -> Option<(NodeId, f64)> {
        self.adj
            .keys()
            .filter_map(|&id| {
                let p = coords.get(&id)?;
                Some((id, geo::haversine(point.lon, point.lat, p.lon, p.lat)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn ensure_node(&mut self, node: NodeId) {
        self.adj.entry(node).or_default();
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        self.adj.entry(from).or_default().push(Edge { to, attrs });
        self.edge_count += 1;
    }
}

/// Build the directed routing graph for one travel mode.
///
/// Segment endpoints missing from the coordinate cache silently drop that
/// segment; the rest of the way still contributes.
pub fn build_routing_graph(
    ways: &[Way],
    coords: &CoordCache,
    mode: TravelMode,
    metric: CostMetric,
) -> RoutingGraph {
    let mut graph = RoutingGraph {
        adj: FxHashMap::default(),
        mode,
        metric,
        edge_count: 0,
    };

    for way in ways {
        let Some(highway) = way.tags.get("highway") else {
            continue;
        };
        if !mode.allows(highway) {
            continue;
        }

        let speed_kph = way
            .tags
            .get("maxspeed")
            .and_then(parse_maxspeed)
            .unwrap_or_else(|| mode.default_speed_kph(highway));
        let name = way.tags.get("name").unwrap_or("");

        // oneway=yes|1|true → forward only; oneway=-1 → reverse only;
        // everything else (and every non-drive mode) → both directions.
        let oneway_tag = way.tags.get("oneway").unwrap_or("");
        let is_oneway = matches!(oneway_tag, "yes" | "1" | "true" | "-1");
        let is_reverse = oneway_tag == "-1";

        for pair in way.node_refs.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            let (Some(pu), Some(pv)) = (coords.get(&u), coords.get(&v)) else {
                continue;
            };

            let distance_m = pu.distance_m(*pv);
            let travel_time_s = distance_m / 1000.0 / speed_kph * 3600.0;
            let attrs = EdgeAttrs {
                distance_m,
                travel_time_s,
                name: name.into(),
                highway: highway.into(),
            };

            graph.ensure_node(u);
            graph.ensure_node(v);

            if mode == TravelMode::Drive {
                if is_reverse {
                    // Reverse-only: the forward edge must never exist.
                    graph.add_edge(v, u, attrs);
                } else if is_oneway {
                    graph.add_edge(u, v, attrs);
                } else {
                    graph.add_edge(u, v, attrs.clone());
                    graph.add_edge(v, u, attrs);
                }
            } else {
                graph.add_edge(u, v, attrs.clone());
                graph.add_edge(v, u, attrs);
            }
        }
    }

    log::debug!(
        "built {mode} graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}
