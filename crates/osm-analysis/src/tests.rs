//! Unit tests for osm-analysis.

#[cfg(test)]
mod helpers {
    use osm_core::{GeoPoint, NodeId, TagMap, WayId};
    use osm_parse::{CoordCache, Way};
    use osm_routing::{build_routing_graph, CostMetric, RoutingGraph, TravelMode};

    pub fn cache(points: &[(i64, f64, f64)]) -> CoordCache {
        points
            .iter()
            .map(|&(id, lat, lon)| (NodeId(id), GeoPoint::new(lat, lon)))
            .collect()
    }

    pub fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> Way {
        Way {
            id: WayId(id),
            node_refs: refs.iter().map(|&r| NodeId(r)).collect(),
            tags: tags.iter().copied().collect::<TagMap>(),
        }
    }

    pub fn drive_graph(ways: &[Way], coords: &CoordCache) -> RoutingGraph {
        build_routing_graph(ways, coords, TravelMode::Drive, CostMetric::Distance)
    }

    /// Straight line 1-2-3-4 along the equator, ~111 m per hop.
    pub fn line() -> (RoutingGraph, CoordCache) {
        let coords = cache(&[
            (1, 0.0, 0.000),
            (2, 0.0, 0.001),
            (3, 0.0, 0.002),
            (4, 0.0, 0.003),
        ]);
        let ways = vec![way(1, &[1, 2, 3, 4], &[("highway", "residential")])];
        let graph = drive_graph(&ways, &coords);
        (graph, coords)
    }

    /// Simple 4-cycle 1-2-3-4-1.
    pub fn cycle() -> (RoutingGraph, CoordCache) {
        let coords = cache(&[
            (1, 0.000, 0.000),
            (2, 0.000, 0.001),
            (3, 0.001, 0.001),
            (4, 0.001, 0.000),
        ]);
        let ways = vec![way(1, &[1, 2, 3, 4, 1], &[("highway", "residential")])];
        let graph = drive_graph(&ways, &coords);
        (graph, coords)
    }

    /// Star: hub 1 with leaves 2-5.
    pub fn star() -> (RoutingGraph, CoordCache) {
        let coords = cache(&[
            (1, 0.000, 0.000),
            (2, 0.001, 0.000),
            (3, -0.001, 0.000),
            (4, 0.000, 0.001),
            (5, 0.000, -0.001),
        ]);
        let ways = vec![
            way(1, &[1, 2], &[("highway", "residential")]),
            way(2, &[1, 3], &[("highway", "residential")]),
            way(3, &[1, 4], &[("highway", "residential")]),
            way(4, &[1, 5], &[("highway", "residential")]),
        ];
        let graph = drive_graph(&ways, &coords);
        (graph, coords)
    }

    /// 3x3 grid, row-major IDs:
    ///   1 2 3
    ///   4 5 6
    ///   7 8 9
    pub fn grid3() -> (RoutingGraph, CoordCache) {
        let mut points = Vec::new();
        for row in 0..3i64 {
            for col in 0..3i64 {
                let id = row * 3 + col + 1;
                points.push((id, -0.001 * row as f64, 0.001 * col as f64));
            }
        }
        let coords = cache(&points);
        let ways = vec![
            way(1, &[1, 2, 3], &[("highway", "residential")]),
            way(2, &[4, 5, 6], &[("highway", "residential")]),
            way(3, &[7, 8, 9], &[("highway", "residential")]),
            way(4, &[1, 4, 7], &[("highway", "residential")]),
            way(5, &[2, 5, 8], &[("highway", "residential")]),
            way(6, &[3, 6, 9], &[("highway", "residential")]),
        ];
        let graph = drive_graph(&ways, &coords);
        (graph, coords)
    }

    /// Two disjoint 2-node components.
    pub fn two_islands() -> (RoutingGraph, CoordCache) {
        let coords = cache(&[
            (1, 0.0, 0.000),
            (2, 0.0, 0.001),
            (3, 1.0, 0.000),
            (4, 1.0, 0.001),
        ]);
        let ways = vec![
            way(1, &[1, 2], &[("highway", "residential")]),
            way(2, &[3, 4], &[("highway", "residential")]),
        ];
        let graph = drive_graph(&ways, &coords);
        (graph, coords)
    }
}

#[cfg(test)]
mod component_tests {
    use osm_core::NodeId;
    use osm_routing::shortest;

    use super::helpers;
    use crate::components::{components, dead_ends, is_connected, network_report};

    #[test]
    fn line_is_one_component() {
        let (graph, _) = helpers::line();
        let comps = components(&graph);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].len(), 4);
        assert!(is_connected(&graph));
    }

    #[test]
    fn two_islands_split() {
        let (graph, _) = helpers::two_islands();
        let comps = components(&graph);
        let sizes: Vec<usize> = comps.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2]);
        assert!(!is_connected(&graph));

        // Cross-component routing is a no-route, not an error.
        assert!(shortest(&graph, NodeId(1), NodeId(3)).is_none());
    }

    #[test]
    fn line_dead_ends_are_its_endpoints() {
        let (graph, _) = helpers::line();
        assert_eq!(dead_ends(&graph), vec![NodeId(1), NodeId(4)]);
    }

    #[test]
    fn cycle_has_no_dead_ends() {
        let (graph, _) = helpers::cycle();
        assert!(dead_ends(&graph).is_empty());
    }

    #[test]
    fn report_counts_intersections() {
        let (graph, _) = helpers::star();
        let report = network_report(&graph);
        assert_eq!(report.components.len(), 1);
        assert_eq!(report.dead_ends.len(), 4);
        assert_eq!(report.intersections, 1); // only the hub has degree ≥ 3
        assert!(report.is_connected());
    }

    #[test]
    fn oneway_does_not_disconnect_the_undirected_view() {
        let coords = helpers::cache(&[(1, 0.0, 0.0), (2, 0.0, 0.001)]);
        let ways = vec![helpers::way(
            1,
            &[1, 2],
            &[("highway", "primary"), ("oneway", "-1")],
        )];
        let graph = helpers::drive_graph(&ways, &coords);
        assert!(is_connected(&graph));
    }
}

#[cfg(test)]
mod cut_tests {
    use osm_core::NodeId;

    use super::helpers;
    use crate::cut::{articulation_points, bridges};

    #[test]
    fn every_line_edge_is_a_bridge() {
        let (graph, _) = helpers::line();
        let found = bridges(&graph);
        assert_eq!(found.len(), 3);
        assert_eq!(
            found,
            vec![
                (NodeId(1), NodeId(2)),
                (NodeId(2), NodeId(3)),
                (NodeId(3), NodeId(4)),
            ]
        );
    }

    #[test]
    fn cycles_have_no_bridges_or_cut_vertices() {
        let (graph, _) = helpers::cycle();
        assert!(bridges(&graph).is_empty());
        assert!(articulation_points(&graph).is_empty());
    }

    #[test]
    fn line_interior_nodes_are_articulation_points() {
        let (graph, _) = helpers::line();
        let points = articulation_points(&graph);
        let ids: Vec<NodeId> = points.iter().map(|(n, _)| *n).collect();
        assert_eq!(ids, vec![NodeId(2), NodeId(3)]);
        assert!(points.iter().all(|&(_, gained)| gained == 1));
    }

    #[test]
    fn star_hub_is_the_only_cut_vertex() {
        let (graph, _) = helpers::star();
        assert_eq!(bridges(&graph).len(), 4);

        let points = articulation_points(&graph);
        assert_eq!(points.len(), 1);
        let (hub, gained) = points[0];
        assert_eq!(hub, NodeId(1));
        // Removing the hub shatters 1 component into 4 singletons.
        assert_eq!(gained, 3);
    }

    #[test]
    fn parallel_roads_collapse_to_one_undirected_edge() {
        // Two ways covering the same segment collapse into a single
        // neighbour relation, so the bridge check severs them together.
        let coords = helpers::cache(&[(1, 0.0, 0.0), (2, 0.0, 0.001)]);
        let ways = vec![
            helpers::way(1, &[1, 2], &[("highway", "residential")]),
            helpers::way(2, &[1, 2], &[("highway", "primary")]),
        ];
        let graph = helpers::drive_graph(&ways, &coords);
        assert_eq!(bridges(&graph).len(), 1);
    }
}

#[cfg(test)]
mod centrality_tests {
    use osm_core::NodeId;

    use super::helpers;
    use crate::centrality::betweenness_centrality;

    #[test]
    fn star_hub_ranks_first() {
        let (graph, _) = helpers::star();
        let scores = betweenness_centrality(&graph, 100, 7);
        assert_eq!(scores.ranked[0].0, NodeId(1));
        assert!(scores.ranked[0].1 > 0.0);
        // Leaves lie on no shortest path between other nodes.
        assert_eq!(scores.score(NodeId(2)), 0.0);
    }

    #[test]
    fn grid_centre_is_strictly_highest() {
        let (graph, _) = helpers::grid3();
        for sample in [5, 9, 100] {
            let scores = betweenness_centrality(&graph, sample, 42);
            let (top, top_score) = scores.ranked[0];
            assert_eq!(top, NodeId(5), "sample={sample}");
            assert!(
                top_score > scores.ranked[1].1,
                "sample={sample}: centre must be strictly highest"
            );
        }
    }

    #[test]
    fn sample_larger_than_graph_degrades_to_exact() {
        let (graph, _) = helpers::line();
        let scores = betweenness_centrality(&graph, 1_000, 1);
        assert_eq!(scores.sampled_sources, 4);
        // Interior nodes carry all the betweenness on a path graph.
        assert!(scores.score(NodeId(2)) > 0.0);
        assert_eq!(scores.score(NodeId(1)), 0.0);
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let (graph, _) = helpers::grid3();
        let a = betweenness_centrality(&graph, 5, 99);
        let b = betweenness_centrality(&graph, 5, 99);
        assert_eq!(a.ranked, b.ranked);
    }

    #[test]
    fn empty_graph_yields_empty_ranking() {
        let coords = helpers::cache(&[]);
        let graph = helpers::drive_graph(&[], &coords);
        let scores = betweenness_centrality(&graph, 10, 0);
        assert!(scores.ranked.is_empty());
    }
}

#[cfg(test)]
mod detour_tests {
    use super::helpers;
    use crate::detour::detour_factor;

    #[test]
    fn straight_line_detour_is_neutral() {
        let (graph, coords) = helpers::line();
        let stats = detour_factor(&graph, &coords, 50, 3).unwrap();
        assert!(stats.samples > 0);
        assert!((stats.mean - 1.0).abs() < 1e-3, "mean {}", stats.mean);
        assert!(stats.min >= 1.0 - 1e-6);
        assert!(stats.max <= 1.0 + 1e-3);
    }

    #[test]
    fn grid_detour_exceeds_one() {
        let (graph, coords) = helpers::grid3();
        let stats = detour_factor(&graph, &coords, 50, 11).unwrap();
        // Diagonal pairs must route around the blocks.
        assert!(stats.max > 1.2, "max {}", stats.max);
        assert!(stats.mean >= 1.0 - 1e-9);
        assert!(stats.p10 <= stats.median && stats.median <= stats.p90);
    }

    #[test]
    fn restricted_to_largest_component() {
        let (graph, coords) = helpers::two_islands();
        // Each island spans ~111 m; pairs are sampled within one island
        // only, and both qualify over the 100 m floor.
        let stats = detour_factor(&graph, &coords, 10, 5).unwrap();
        assert!(stats.samples > 0);
        assert!((stats.mean - 1.0).abs() < 1e-3);
    }

    #[test]
    fn seed_reproducibility() {
        let (graph, coords) = helpers::grid3();
        let a = detour_factor(&graph, &coords, 20, 123);
        let b = detour_factor(&graph, &coords, 20, 123);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_graphs_yield_none() {
        let coords = helpers::cache(&[]);
        let graph = helpers::drive_graph(&[], &coords);
        assert!(detour_factor(&graph, &coords, 10, 0).is_none());
    }
}
