//! Unit tests for osm-export.

#[cfg(test)]
mod helpers {
    use osm_core::{GeoPoint, NodeId, TagMap, WayId};
    use osm_parse::{CoordCache, Node, Way};
    use osm_routing::{build_routing_graph, CostMetric, RoutingGraph, TravelMode};

    pub fn cache(points: &[(i64, f64, f64)]) -> CoordCache {
        points
            .iter()
            .map(|&(id, lat, lon)| (NodeId(id), GeoPoint::new(lat, lon)))
            .collect()
    }

    pub fn node(id: i64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> Node {
        Node {
            id: NodeId(id),
            point: GeoPoint::new(lat, lon),
            tags: tags.iter().copied().collect::<TagMap>(),
        }
    }

    pub fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> Way {
        Way {
            id: WayId(id),
            node_refs: refs.iter().map(|&r| NodeId(r)).collect(),
            tags: tags.iter().copied().collect::<TagMap>(),
        }
    }

    /// Line 1-2-3 plus an isolated node 9.
    pub fn graph_and_coords() -> (RoutingGraph, CoordCache) {
        let coords = cache(&[
            (1, 0.0, 0.000),
            (2, 0.0, 0.001),
            (3, 0.0, 0.002),
            (9, 1.0, 1.000),
        ]);
        let ways = vec![
            way(1, &[1, 2, 3], &[("highway", "residential"), ("name", "Main Street")]),
        ];
        let graph = build_routing_graph(&ways, &coords, TravelMode::Drive, CostMetric::Time);
        (graph, coords)
    }
}

#[cfg(test)]
mod geojson_tests {
    use osm_core::NodeId;
    use osm_geom::extract_features;
    use osm_routing::{alternatives, shortest};

    use super::helpers;
    use crate::geojson::{
        alternatives_collection, centrality_collection, feature_collection, route_collection,
        write_collection,
    };

    #[test]
    fn feature_collection_shape() {
        let nodes = vec![helpers::node(5, 51.5, -0.1, &[("amenity", "cafe"), ("name", "Cafe")])];
        let coords = helpers::cache(&[(1, 0.0, 0.0), (2, 0.0, 0.001)]);
        let ways = vec![helpers::way(7, &[1, 2], &[("highway", "residential")])];

        let set = extract_features(&nodes, &ways, &coords);
        let value = feature_collection(&set);

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[0]["properties"]["subtype"], "cafe");
        assert_eq!(features[0]["properties"]["name"], "Cafe");
        assert_eq!(features[1]["geometry"]["type"], "LineString");
        assert_eq!(features[1]["properties"]["id"], 7);
    }

    #[test]
    fn route_collection_has_line_and_endpoints() {
        let (graph, coords) = helpers::graph_and_coords();
        let path = shortest(&graph, NodeId(1), NodeId(3)).unwrap();

        let value = route_collection(&path, &coords);
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0]["geometry"]["type"], "LineString");
        assert_eq!(
            features[0]["geometry"]["coordinates"].as_array().unwrap().len(),
            3
        );
        assert_eq!(features[0]["properties"]["nodes"], 3);
        assert_eq!(features[1]["properties"]["type"], "origin");
        assert_eq!(features[2]["properties"]["type"], "destination");
    }

    #[test]
    fn alternatives_carry_rank_and_colour() {
        let (graph, coords) = helpers::graph_and_coords();
        let routes = alternatives(&graph, NodeId(1), NodeId(3), 2);
        assert_eq!(routes.len(), 1);

        let value = alternatives_collection(&routes, &coords);
        let features = value["features"].as_array().unwrap();
        // One line plus the two endpoints.
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["properties"]["route_type"], "fastest");
        assert_eq!(features[0]["properties"]["color"], "#0066FF");
    }

    #[test]
    fn centrality_points_ranked() {
        let (graph, coords) = helpers::graph_and_coords();
        let scores = osm_analysis::betweenness_centrality(&graph, 10, 1);

        let value = centrality_collection(&scores, &coords, 2);
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["rank"], 1);
        // Node 2 is the only interior node on the line.
        assert_eq!(features[0]["properties"]["node_id"], 2);
    }

    #[test]
    fn written_collection_parses_back() {
        let (graph, coords) = helpers::graph_and_coords();
        let path = shortest(&graph, NodeId(1), NodeId(3)).unwrap();
        let value = route_collection(&path, &coords);

        let mut buffer = Vec::new();
        write_collection(&mut buffer, &value).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
    }
}

#[cfg(test)]
mod csv_tests {
    use osm_core::NodeId;
    use osm_geom::extract_features;
    use osm_routing::distance_matrix;

    use super::helpers;
    use crate::csv::{write_features, write_matrix};

    #[test]
    fn feature_table_rows() {
        let nodes = vec![helpers::node(5, 51.5, -0.1, &[("amenity", "cafe")])];
        let coords = helpers::cache(&[(1, 0.0, 0.0), (2, 0.0, 0.001)]);
        let ways = vec![helpers::way(7, &[1, 2], &[("highway", "residential")])];
        let set = extract_features(&nodes, &ways, &coords);

        let mut buffer = Vec::new();
        write_features(&mut buffer, &set).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3); // header + two features
        assert!(lines[0].starts_with("osm_id,kind,subtype"));
        assert!(lines[1].starts_with("5,amenity,cafe"));
        assert!(lines[2].starts_with("7,highway,residential"));
    }

    #[test]
    fn matrix_long_format_with_empty_unreachables() {
        let (graph, _) = helpers::graph_and_coords();
        // Node 9 is isolated: no edges, so it is not even in the graph;
        // use the line endpoints plus the middle.
        let points = [NodeId(1), NodeId(2), NodeId(3)];
        let matrix = distance_matrix(&graph, &points, &points);

        let mut buffer = Vec::new();
        write_matrix(&mut buffer, &matrix).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 9);
        assert_eq!(lines[0], "from,to,distance_m,time_s");
        // Diagonal is exactly zero.
        assert!(lines[1].starts_with("1,1,0.0,0.0"));
    }

    #[test]
    fn unreachable_cells_are_empty() {
        let coords = helpers::cache(&[
            (1, 0.0, 0.000),
            (2, 0.0, 0.001),
            (3, 1.0, 0.000),
            (4, 1.0, 0.001),
        ]);
        let ways = vec![
            helpers::way(1, &[1, 2], &[("highway", "residential")]),
            helpers::way(2, &[3, 4], &[("highway", "residential")]),
        ];
        let graph = osm_routing::build_routing_graph(
            &ways,
            &coords,
            osm_routing::TravelMode::Drive,
            osm_routing::CostMetric::Time,
        );

        let matrix = distance_matrix(&graph, &[NodeId(1)], &[NodeId(4)]);
        let mut buffer = Vec::new();
        write_matrix(&mut buffer, &matrix).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("1,4,,"));
    }
}
