//! Approximate betweenness centrality.
//!
//! Sampled Brandes-style accounting in the original's shape: run a
//! shortest-path search from S sampled sources, record every equal-cost
//! shortest path to every reachable node, and credit each intermediate node
//! `1/|paths|` per path.  Scores are normalised by `2/((V-1)(V-2))` and
//! scaled by `V/S` to compensate for sampling.
//!
//! # Memory cap
//!
//! Equal-cost path sets explode on grid-like networks, so at most
//! [`MAX_PATHS_PER_TARGET`] paths are kept per (source, target); further
//! equal-cost arrivals are dropped and counted in
//! [`CentralityScores::truncated_path_sets`].

use std::collections::BinaryHeap;

use osm_core::{NodeId, SampleRng};
use osm_routing::RoutingGraph;
use rustc_hash::FxHashMap;

use crate::view::UndirectedView;

/// Cap on equal-cost paths tracked per (source, target) pair.
pub const MAX_PATHS_PER_TARGET: usize = 32;

/// Relative tolerance for treating two path costs as equal.  Haversine edge
/// lengths vary in the tenth decimal across grid rows, so exact float
/// equality would silently drop genuinely symmetric alternatives; real
/// detours differ by whole metres and stay well clear of this band.
const EQUAL_COST_TOLERANCE: f64 = 1e-9;

#[inline]
fn approx_equal_cost(a: f64, b: f64) -> bool {
    (a - b).abs() <= EQUAL_COST_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Ranked centrality result.
#[derive(Clone, Debug)]
pub struct CentralityScores {
    /// `(node, score)` sorted by descending score, ties by ascending ID.
    pub ranked: Vec<(NodeId, f64)>,
    /// How many source nodes were actually sampled.
    pub sampled_sources: usize,
    /// Path sets that hit [`MAX_PATHS_PER_TARGET`].
    pub truncated_path_sets: u64,
}

impl CentralityScores {
    /// Score of one node; 0.0 for nodes outside the graph.
    pub fn score(&self, node: NodeId) -> f64 {
        self.ranked
            .iter()
            .find(|(n, _)| *n == node)
            .map_or(0.0, |(_, s)| *s)
    }
}

/// Approximate betweenness centrality over `sample_size` sampled sources.
///
/// Deterministic for a fixed graph and `seed`.  A `sample_size` at or above
/// the node count degrades gracefully to the exact computation.
pub fn betweenness_centrality(
    graph: &RoutingGraph,
    sample_size: usize,
    seed: u64,
) -> CentralityScores {
    let view = UndirectedView::from_graph(graph);
    let nodes = view.nodes();
    let n = nodes.len();

    let mut scores: FxHashMap<NodeId, f64> =
        nodes.iter().map(|&id| (id, 0.0)).collect();

    if n == 0 || sample_size == 0 {
        return CentralityScores { ranked: Vec::new(), sampled_sources: 0, truncated_path_sets: 0 };
    }

    let mut rng = SampleRng::new(seed);
    let mut sources: Vec<NodeId> = rng
        .choose_multiple(nodes, sample_size.min(n))
        .into_iter()
        .copied()
        .collect();
    sources.sort_unstable();

    let mut truncated = 0u64;
    for (i, &source) in sources.iter().enumerate() {
        if (i + 1) % 10 == 0 {
            log::debug!("centrality: source {}/{}", i + 1, sources.len());
        }
        let paths = all_shortest_paths(&view, source, &mut truncated);
        for (target, path_set) in &paths {
            if *target == source || path_set.is_empty() {
                continue;
            }
            let credit = 1.0 / path_set.len() as f64;
            for path in path_set {
                for node in &path[1..path.len() - 1] {
                    *scores.entry(*node).or_insert(0.0) += credit;
                }
            }
        }
    }

    // Pair normalisation, then sample-size compensation.
    if n > 2 {
        let scale = 2.0 / ((n - 1) as f64 * (n - 2) as f64) * (n as f64 / sources.len() as f64);
        for score in scores.values_mut() {
            *score *= scale;
        }
    }

    let mut ranked: Vec<(NodeId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    CentralityScores {
        ranked,
        sampled_sources: sources.len(),
        truncated_path_sets: truncated,
    }
}

// ── All-shortest-paths search ─────────────────────────────────────────────────

struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.node == other.node
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
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Distance-weighted search recording every equal-cost shortest path, capped
/// per target.
fn all_shortest_paths(
    view: &UndirectedView,
    source: NodeId,
    truncated: &mut u64,
) -> FxHashMap<NodeId, Vec<Vec<NodeId>>> {
    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut paths: FxHashMap<NodeId, Vec<Vec<NodeId>>> = FxHashMap::default();
    let mut visited: rustc_hash::FxHashSet<NodeId> = rustc_hash::FxHashSet::default();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    paths.insert(source, vec![vec![source]]);
    heap.push(HeapEntry { cost: 0.0, node: source });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if !visited.insert(node) {
            continue;
        }

        let from_paths = paths.get(&node).cloned().unwrap_or_default();
        for &(neighbour, weight) in view.neighbours(node) {
            let next = cost + weight;
            let known = dist.get(&neighbour).copied();

            match known {
                Some(d) if approx_equal_cost(next, d) => {
                    let entry = paths.entry(neighbour).or_default();
                    for path in &from_paths {
                        if entry.len() >= MAX_PATHS_PER_TARGET {
                            *truncated += 1;
                            break;
                        }
                        let mut extended = path.clone();
                        extended.push(neighbour);
                        entry.push(extended);
                    }
                }
                Some(d) if next >= d => {}
                _ => {
                    dist.insert(neighbour, next);
                    paths.insert(neighbour, extend_paths(&from_paths, neighbour));
                    heap.push(HeapEntry { cost: next, node: neighbour });
                }
            }
        }
    }

    paths
}

fn extend_paths(from_paths: &[Vec<NodeId>], to: NodeId) -> Vec<Vec<NodeId>> {
    from_paths
        .iter()
        .take(MAX_PATHS_PER_TARGET)
        .map(|p| {
            let mut extended = p.clone();
            extended.push(to);
            extended
        })
        .collect()
}
