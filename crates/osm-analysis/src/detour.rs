//! Detour factor: network distance over straight-line distance for random
//! node pairs.

use osm_core::{geo, SampleRng};
use osm_parse::CoordCache;
use osm_routing::{dijkstra, RoutingGraph};

use crate::components::components;

/// Pairs closer than this straight-line distance are skipped: the ratio is
/// dominated by snapping noise at short range.
const MIN_STRAIGHT_M: f64 = 100.0;

/// Attempt budget multiplier: sampling gives up after `10 × sample` draws.
const ATTEMPT_FACTOR: usize = 10;

/// Distribution of network/straight-line distance ratios.
#[derive(Clone, Debug, PartialEq)]
pub struct DetourStats {
    pub samples: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p90: f64,
}

/// Sample `sample` random node pairs from the largest connected component
/// and measure their detour factors.  Deterministic for a fixed graph and
/// `seed`.
///
/// Returns `None` when the largest component has fewer than two nodes or no
/// valid pair was found within the attempt budget.
pub fn detour_factor(
    graph: &RoutingGraph,
    coords: &CoordCache,
    sample: usize,
    seed: u64,
) -> Option<DetourStats> {
    let component_list = components(graph);
    let largest = component_list.first()?;
    if largest.len() < 2 {
        return None;
    }

    let n = largest.len();
    let n_pairs = sample.min(n * (n - 1) / 2);
    let mut rng = SampleRng::new(seed);

    let mut factors: Vec<f64> = Vec::with_capacity(n_pairs);
    let mut attempts = 0;
    let max_attempts = n_pairs * ATTEMPT_FACTOR;

    while factors.len() < n_pairs && attempts < max_attempts {
        attempts += 1;

        let picked = rng.choose_multiple(largest, 2);
        let (&a, &b) = (picked[0], picked[1]);
        let (Some(pa), Some(pb)) = (coords.get(&a), coords.get(&b)) else {
            continue;
        };

        let straight = geo::haversine(pa.lon, pa.lat, pb.lon, pb.lat);
        if straight < MIN_STRAIGHT_M {
            continue;
        }

        // Network distance in metres, whatever metric the graph optimises.
        let Some(path) =
            dijkstra::shortest_with(graph, a, b, |attrs| attrs.distance_m, None, None)
        else {
            // Oneways can make a pair one-way-unreachable inside an
            // undirected component; try another pair.
            continue;
        };

        factors.push(path.cost / straight);

        if factors.len() % 20 == 0 {
            log::debug!("detour: {}/{} pairs", factors.len(), n_pairs);
        }
    }

    if factors.is_empty() {
        return None;
    }

    let mut sorted = factors.clone();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();

    Some(DetourStats {
        samples: len,
        mean: factors.iter().sum::<f64>() / len as f64,
        median: sorted[len / 2],
        min: sorted[0],
        max: sorted[len - 1],
        p10: sorted[(len as f64 * 0.1) as usize],
        p90: sorted[(len as f64 * 0.9) as usize],
    })
}
