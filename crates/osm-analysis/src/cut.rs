//! Bridges and articulation points by removal diff.
//!
//! Brute force on purpose: remove a candidate, recount components, compare.
//! O(E·(V+E)) for bridges and O(V·(V+E)) for articulation points, which is
//! fine at the city and suburb scales this engine targets, and the
//! discovery order (ascending IDs) is part of the observable contract.
//! Removal is simulated by exclusion during traversal; the view itself is
//! never mutated.

use std::collections::VecDeque;

use osm_core::NodeId;
use osm_routing::RoutingGraph;
use rustc_hash::FxHashSet;

use crate::view::UndirectedView;

/// Undirected edges whose removal increases the component count, in
/// ascending `(a, b)` order with `a < b`.
pub fn bridges(graph: &RoutingGraph) -> Vec<(NodeId, NodeId)> {
    let view = UndirectedView::from_graph(graph);
    let baseline = count_components(&view, None, None);

    let mut found = Vec::new();
    for (a, b) in view.edges() {
        if count_components(&view, None, Some((a, b))) > baseline {
            found.push((a, b));
        }
    }
    log::debug!("{} bridges among {} edges", found.len(), view.edges().len());
    found
}

/// Nodes whose removal increases the component count, with the number of
/// extra components their removal creates.  Sorted by that gain descending,
/// then by ID.
///
/// Degree-0 and degree-1 nodes are skipped: removing them can never split
/// the network.
pub fn articulation_points(graph: &RoutingGraph) -> Vec<(NodeId, usize)> {
    let view = UndirectedView::from_graph(graph);
    let baseline = count_components(&view, None, None);

    let mut found = Vec::new();
    for &node in view.nodes() {
        if view.degree(node) < 2 {
            continue;
        }
        let without = count_components(&view, Some(node), None);
        if without > baseline {
            found.push((node, without - baseline));
        }
    }

    found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    found
}

/// Component count with an optional node and/or undirected edge excluded
/// from traversal.  An excluded node is not counted as a component either.
fn count_components(
    view: &UndirectedView,
    skip_node: Option<NodeId>,
    skip_edge: Option<(NodeId, NodeId)>,
) -> usize {
    let excluded = |a: NodeId, b: NodeId| {
        skip_edge.is_some_and(|(x, y)| (a == x && b == y) || (a == y && b == x))
    };

    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut count = 0;

    for &start in view.nodes() {
        if Some(start) == skip_node || visited.contains(&start) {
            continue;
        }
        count += 1;

        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(node) = queue.pop_front() {
            for &(neighbour, _) in view.neighbours(node) {
                if Some(neighbour) == skip_node || excluded(node, neighbour) {
                    continue;
                }
                if visited.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    count
}
