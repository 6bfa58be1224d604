//! Binary-heap Dijkstra over the routing graph.
//!
//! One implementation serves every query shape: single target, early
//! terminating multi-target (the distance-matrix case), penalised edges
//! (the k-alternatives case), and cooperative cancellation.  Costs are f64;
//! ties break by enqueue order so results are stable with respect to
//! adjacency-list order.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use osm_core::NodeId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{EdgeAttrs, RoutingGraph};

// ── Query-side types ──────────────────────────────────────────────────────────

/// Per-edge cost multipliers used by the alternatives search.  Absent edges
/// multiply by 1.0.  Multipliers only ever grow.
#[derive(Clone, Debug, Default)]
pub struct PenaltyMap {
    factors: FxHashMap<(NodeId, NodeId), f64>,
}

impl PenaltyMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn factor(&self, from: NodeId, to: NodeId) -> f64 {
        self.factors.get(&(from, to)).copied().unwrap_or(1.0)
    }

    /// Multiply the penalty on `from → to` by `factor`.
    pub fn multiply(&mut self, from: NodeId, to: NodeId, factor: f64) {
        debug_assert!(factor >= 1.0, "penalty factors must not discount edges");
        *self.factors.entry((from, to)).or_insert(1.0) *= factor;
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Cooperative cancellation flag, checked at heap-pop boundaries.  Clone it
/// into whatever owns the deadline; a cancelled search returns `None`.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A found route: node sequence plus accumulated totals.
///
/// `cost` is the optimised quantity (including any penalties);
/// `distance_m`/`time_s` are the true totals of the traversed edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
    pub distance_m: f64,
    pub time_s: f64,
}

impl Path {
    fn trivial(node: NodeId) -> Self {
        Path { nodes: vec![node], cost: 0.0, distance_m: 0.0, time_s: 0.0 }
    }

    /// Consecutive node pairs along the path.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

// ── Heap entry ────────────────────────────────────────────────────────────────

/// Min-heap entry.  Ordering is reversed (BinaryHeap is a max-heap) and ties
/// on cost fall back to the enqueue sequence number: first enqueued pops
/// first.
struct HeapEntry {
    cost: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Shortest path under the graph's own metric, no penalties.
pub fn shortest(graph: &RoutingGraph, source: NodeId, target: NodeId) -> Option<Path> {
    shortest_with(graph, source, target, |a| graph.edge_cost(a), None, None)
}

/// Shortest path under an arbitrary non-negative cost function, with
/// optional penalties and cancellation.
///
/// Returns `None` when the target is unreachable or the search was
/// cancelled.  `source == target` yields the trivial single-node path.
pub fn shortest_with<F>(
    graph: &RoutingGraph,
    source: NodeId,
    target: NodeId,
    cost_fn: F,
    penalties: Option<&PenaltyMap>,
    cancel: Option<&CancelFlag>,
) -> Option<Path>
where
    F: Fn(&EdgeAttrs) -> f64,
{
    if source == target {
        return Some(Path::trivial(source));
    }

    let mut search = Search::new(graph, source, cost_fn, penalties);
    while let Some((node, cost)) = search.pop(cancel)? {
        if node == target {
            return Some(search.reconstruct(target, cost));
        }
        search.relax(node, cost);
    }
    None
}

/// Run Dijkstra from `source` until every reachable member of `targets` is
/// finalised, then stop.  Unreachable targets are absent from the result.
pub fn shortest_to_any(
    graph: &RoutingGraph,
    source: NodeId,
    targets: &FxHashSet<NodeId>,
) -> FxHashMap<NodeId, Path> {
    let mut results = FxHashMap::default();
    let mut remaining: FxHashSet<NodeId> = targets.clone();

    if remaining.remove(&source) {
        results.insert(source, Path::trivial(source));
    }
    if remaining.is_empty() {
        return results;
    }

    let mut search = Search::new(graph, source, |a| graph.edge_cost(a), None);
    while let Some(Some((node, cost))) = search.pop(None) {
        if remaining.remove(&node) {
            results.insert(node, search.reconstruct(node, cost));
            if remaining.is_empty() {
                break;
            }
        }
        search.relax(node, cost);
    }
    results
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Shared Dijkstra state: distance map, predecessor edges, heap.
struct Search<'g, F> {
    graph: &'g RoutingGraph,
    cost_fn: F,
    penalties: Option<&'g PenaltyMap>,
    dist: FxHashMap<NodeId, f64>,
    /// Predecessor node and index into its adjacency list, for exact edge
    /// reconstruction through parallel edges.
    prev: FxHashMap<NodeId, (NodeId, usize)>,
    visited: FxHashSet<NodeId>,
    heap: BinaryHeap<HeapEntry>,
    seq: u64,
}

impl<'g, F: Fn(&EdgeAttrs) -> f64> Search<'g, F> {
    fn new(
        graph: &'g RoutingGraph,
        source: NodeId,
        cost_fn: F,
        penalties: Option<&'g PenaltyMap>,
    ) -> Self {
        let mut search = Search {
            graph,
            cost_fn,
            penalties,
            dist: FxHashMap::default(),
            prev: FxHashMap::default(),
            visited: FxHashSet::default(),
            heap: BinaryHeap::new(),
            seq: 0,
        };
        search.dist.insert(source, 0.0);
        search.heap.push(HeapEntry { cost: 0.0, seq: 0, node: source });
        search.seq = 1;
        search
    }

    /// Pop the next unvisited node.  `Some(None)` means exhausted;
    /// outer `None` means cancelled.
    fn pop(&mut self, cancel: Option<&CancelFlag>) -> Option<Option<(NodeId, f64)>> {
        loop {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                return None;
            }
            let Some(entry) = self.heap.pop() else {
                return Some(None);
            };
            if self.visited.insert(entry.node) {
                return Some(Some((entry.node, entry.cost)));
            }
        }
    }

    fn relax(&mut self, node: NodeId, cost: f64) {
        for (i, edge) in self.graph.neighbors(node).iter().enumerate() {
            if self.visited.contains(&edge.to) {
                continue;
            }
            let mut edge_cost = (self.cost_fn)(&edge.attrs);
            debug_assert!(edge_cost >= 0.0, "negative edge cost on {node}→{}", edge.to);
            if let Some(penalties) = self.penalties {
                edge_cost *= penalties.factor(node, edge.to);
            }

            let next = cost + edge_cost;
            if next < self.dist.get(&edge.to).copied().unwrap_or(f64::INFINITY) {
                self.dist.insert(edge.to, next);
                self.prev.insert(edge.to, (node, i));
                self.heap.push(HeapEntry { cost: next, seq: self.seq, node: edge.to });
                self.seq += 1;
            }
        }
    }

    /// Walk predecessor edges back to the source, summing true totals.
    fn reconstruct(&self, target: NodeId, cost: f64) -> Path {
        let mut nodes = vec![target];
        let mut distance_m = 0.0;
        let mut time_s = 0.0;

        let mut current = target;
        while let Some(&(prev_node, edge_idx)) = self.prev.get(&current) {
            let attrs = &self.graph.neighbors(prev_node)[edge_idx].attrs;
            distance_m += attrs.distance_m;
            time_s += attrs.travel_time_s;
            nodes.push(prev_node);
            current = prev_node;
        }
        nodes.reverse();

        Path { nodes, cost, distance_m, time_s }
    }
}
