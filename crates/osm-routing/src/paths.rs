//! Higher-level path queries: turn-by-turn directions, k-alternatives,
//! multi-waypoint routes, and the N×N distance matrix.

use osm_core::{geo, NodeId};
use rustc_hash::FxHashSet;

use osm_parse::CoordCache;

use crate::dijkstra::{shortest, shortest_to_any, shortest_with, Path, PenaltyMap};
use crate::graph::RoutingGraph;

// ── Directions ────────────────────────────────────────────────────────────────

/// One turn-by-turn instruction covering a run of same-street travel.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// Human phrasing, e.g. `Turn left onto High Street`.
    pub text: String,
    /// Street the completed run travelled along.
    pub street: String,
    pub distance_m: f64,
    pub time_s: f64,
}

/// Bearing change (degrees, normalised to (-180, 180]) below which travel
/// counts as continuing straight.
const CONTINUE_THRESHOLD: f64 = 20.0;
/// Upper bound for a gentle "bear" manoeuvre.
const BEAR_THRESHOLD: f64 = 70.0;
/// Upper bound for a regular turn; beyond it the phrasing is a U-turn.
const TURN_THRESHOLD: f64 = 150.0;
/// Bearing jump that forces an instruction even on an unchanged street.
const BEARING_TRIGGER: f64 = 30.0;

fn turn_phrase(angle_change: f64) -> &'static str {
    let magnitude = angle_change.abs();
    if magnitude < CONTINUE_THRESHOLD {
        "Continue straight"
    } else if magnitude > TURN_THRESHOLD {
        "Make a U-turn"
    } else if angle_change > 0.0 {
        if magnitude > BEAR_THRESHOLD { "Turn right" } else { "Bear right" }
    } else if magnitude > BEAR_THRESHOLD {
        "Turn left"
    } else {
        "Bear left"
    }
}

/// Normalise a bearing delta into (-180, 180].
fn normalise_angle(mut angle: f64) -> f64 {
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Synthesize turn-by-turn instructions for a path.
///
/// Consecutive edges group by street name; an instruction is emitted at
/// every name change and at bearing jumps above 30° on the same street.
/// The final instruction is always an arrival.
pub fn directions(graph: &RoutingGraph, coords: &CoordCache, path: &Path) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    let mut current_street: Option<String> = None;
    let mut segment_distance = 0.0;
    let mut segment_time = 0.0;
    let mut prev_bearing: Option<f64> = None;

    for (from, to) in path.edges() {
        let attrs = graph.find_edge(from, to);
        let street = attrs
            .map(|a| a.name.as_ref())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed road")
            .to_owned();
        let distance = attrs.map_or(0.0, |a| a.distance_m);
        let time = attrs.map_or(0.0, |a| a.travel_time_s);

        let (Some(pf), Some(pt)) = (coords.get(&from), coords.get(&to)) else {
            continue;
        };
        let bearing = geo::bearing(pf.lon, pf.lat, pt.lon, pt.lat);

        let Some(active) = current_street.clone() else {
            current_street = Some(street);
            segment_distance = distance;
            segment_time = time;
            prev_bearing = Some(bearing);
            continue;
        };

        let delta = prev_bearing.map(|p| normalise_angle(bearing - p));
        let street_changed = street != active;
        let sharp = delta.is_some_and(|d| d.abs() > BEARING_TRIGGER);

        if street_changed || sharp {
            let turn = turn_phrase(delta.unwrap_or(0.0));
            let text = if street_changed {
                format!("{turn} onto {street}")
            } else {
                turn.to_owned()
            };
            instructions.push(Instruction {
                text,
                street: active,
                distance_m: segment_distance,
                time_s: segment_time,
            });
            current_street = Some(street);
            segment_distance = distance;
            segment_time = time;
        } else {
            segment_distance += distance;
            segment_time += time;
        }

        prev_bearing = Some(bearing);
    }

    if let Some(street) = current_street {
        instructions.push(Instruction {
            text: "Arrive at destination".to_owned(),
            street,
            distance_m: segment_distance,
            time_s: segment_time,
        });
    }

    instructions
}

// ── k-alternatives ────────────────────────────────────────────────────────────

/// Cost multiplier applied to every edge of an accepted route.
const PENALTY_FACTOR: f64 = 2.0;
/// Edge-set overlap above which a candidate duplicates an accepted route.
const OVERLAP_LIMIT: f64 = 0.8;

/// Find up to `k` routes from `source` to `target` by iterative edge
/// penalisation.
///
/// After each accepted route its edges cost double; candidates overlapping
/// an accepted route by more than 80% are rejected and their edges penalised
/// twice as hard before the next attempt.  The loop gives up after `2k`
/// iterations and returns whatever it has.  The first route, when any exists,
/// is the unpenalised optimum.
pub fn alternatives(graph: &RoutingGraph, source: NodeId, target: NodeId, k: usize) -> Vec<Path> {
    let mut routes: Vec<Path> = Vec::new();
    let mut accepted_edges: Vec<FxHashSet<(NodeId, NodeId)>> = Vec::new();
    let mut penalties = PenaltyMap::new();

    let max_iterations = 2 * k;
    let mut iterations = 0;

    while routes.len() < k && iterations < max_iterations {
        iterations += 1;

        let Some(path) =
            shortest_with(graph, source, target, |a| graph.edge_cost(a), Some(&penalties), None)
        else {
            break;
        };

        let edge_set: FxHashSet<(NodeId, NodeId)> = path.edges().collect();
        let duplicate = accepted_edges.iter().any(|accepted| {
            let overlap = edge_set.intersection(accepted).count() as f64
                / edge_set.len().max(1) as f64;
            overlap > OVERLAP_LIMIT
        });

        if duplicate {
            for (u, v) in path.edges() {
                penalties.multiply(u, v, PENALTY_FACTOR * 2.0);
            }
            continue;
        }

        for (u, v) in path.edges() {
            penalties.multiply(u, v, PENALTY_FACTOR);
        }
        accepted_edges.push(edge_set);
        routes.push(path);
    }

    routes
}

// ── Multi-waypoint ────────────────────────────────────────────────────────────

/// Route through every waypoint in order, concatenating per-leg shortest
/// paths.  Any unreachable leg fails the whole query.
pub fn route_via(graph: &RoutingGraph, waypoints: &[NodeId]) -> Option<Path> {
    let (&first, rest) = waypoints.split_first()?;
    let mut combined = Path { nodes: vec![first], cost: 0.0, distance_m: 0.0, time_s: 0.0 };

    let mut from = first;
    for &to in rest {
        let leg = shortest(graph, from, to)?;
        // Drop the duplicated junction node.
        combined.nodes.extend(leg.nodes.into_iter().skip(1));
        combined.cost += leg.cost;
        combined.distance_m += leg.distance_m;
        combined.time_s += leg.time_s;
        from = to;
    }

    Some(combined)
}

// ── Distance matrix ───────────────────────────────────────────────────────────

/// Distance and time along the metric-optimal route for one matrix cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatrixEntry {
    pub distance_m: f64,
    pub time_s: f64,
}

/// Many-to-many results; `entries[i][j]` answers `sources[i] → targets[j]`,
/// `None` when unreachable.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    pub sources: Vec<NodeId>,
    pub targets: Vec<NodeId>,
    pub entries: Vec<Vec<Option<MatrixEntry>>>,
}

/// One early-terminating Dijkstra per source.  The diagonal is exactly zero.
pub fn distance_matrix(
    graph: &RoutingGraph,
    sources: &[NodeId],
    targets: &[NodeId],
) -> DistanceMatrix {
    let target_set: FxHashSet<NodeId> = targets.iter().copied().collect();

    let entries = sources
        .iter()
        .map(|&source| {
            let reached = shortest_to_any(graph, source, &target_set);
            targets
                .iter()
                .map(|target| {
                    reached.get(target).map(|path| MatrixEntry {
                        distance_m: path.distance_m,
                        time_s: path.time_s,
                    })
                })
                .collect()
        })
        .collect();

    DistanceMatrix {
        sources: sources.to_vec(),
        targets: targets.to_vec(),
        entries,
    }
}
