//! Undirected projection of the routing graph.

use osm_core::NodeId;
use osm_routing::RoutingGraph;
use rustc_hash::FxHashMap;

/// Undirected adjacency derived from a directed routing graph.
///
/// Neighbour lists are ID-sorted and deduplicated: a oneway street, a
/// bidirectional street, and a doubled parallel road all produce the same
/// single neighbour relation.  Edge weights are the minimum `distance_m`
/// over the collapsed directed edges.
///
/// The view is immutable; the cut-element analytics simulate edge and node
/// removal by exclusion during traversal instead of mutating the adjacency.
#[derive(Clone, Debug, Default)]
pub struct UndirectedView {
    adj: FxHashMap<NodeId, Vec<(NodeId, f64)>>,
    /// All node IDs in ascending order; the deterministic iteration base.
    nodes: Vec<NodeId>,
}

impl UndirectedView {
    pub fn from_graph(graph: &RoutingGraph) -> Self {
        let mut adj: FxHashMap<NodeId, Vec<(NodeId, f64)>> = FxHashMap::default();
        for node in graph.nodes() {
            adj.entry(node).or_default();
            for edge in graph.neighbors(node) {
                adj.entry(node).or_default().push((edge.to, edge.attrs.distance_m));
                adj.entry(edge.to).or_default().push((node, edge.attrs.distance_m));
            }
        }

        // Collapse duplicates keeping the shortest weight.
        for neighbours in adj.values_mut() {
            neighbours.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
            neighbours.dedup_by_key(|(n, _)| *n);
        }

        let mut nodes: Vec<NodeId> = adj.keys().copied().collect();
        nodes.sort_unstable();

        Self { adj, nodes }
    }

    /// Node IDs in ascending order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// ID-sorted neighbour list with distance weights.
    #[inline]
    pub fn neighbours(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.adj.get(&node).map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbours(node).len()
    }

    /// Every undirected edge `(a, b)` with `a < b`, in sorted order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();
        for &node in &self.nodes {
            for &(neighbour, _) in self.neighbours(node) {
                if node < neighbour {
                    edges.push((node, neighbour));
                }
            }
        }
        edges
    }
}
