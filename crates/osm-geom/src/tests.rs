//! Unit tests for osm-geom.

#[cfg(test)]
mod helpers {
    use osm_core::{GeoPoint, NodeId, RelationId, TagMap, WayId};
    use osm_parse::{CoordCache, Member, MemberKind, Relation, Way};

    /// Insert nodes as `(id, x, y)` where x maps to lon and y to lat.
    pub fn cache(points: &[(i64, f64, f64)]) -> CoordCache {
        points
            .iter()
            .map(|&(id, x, y)| (NodeId(id), GeoPoint::new(y, x)))
            .collect()
    }

    pub fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> Way {
        Way {
            id: WayId(id),
            node_refs: refs.iter().map(|&r| NodeId(r)).collect(),
            tags: tags.iter().copied().collect::<TagMap>(),
        }
    }

    pub fn multipolygon_relation(members: &[(i64, &str)]) -> Relation {
        Relation {
            id: RelationId(1),
            members: members
                .iter()
                .map(|&(way_id, role)| Member {
                    kind: MemberKind::Way,
                    ref_id: way_id,
                    role: role.into(),
                })
                .collect(),
            tags: [("type", "multipolygon")].into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod multipolygon {
    use osm_core::geo::{point_in_ring, signed_area};

    use super::helpers::{cache, multipolygon_relation, way};
    use crate::multipolygon::{assemble_multipolygon, MultipolygonAssembler};
    use crate::Geometry;

    /// 10x10 outer square with a 4x4 hole in the middle.
    fn square_with_hole() -> (Vec<osm_parse::Way>, osm_parse::CoordCache) {
        let coords = cache(&[
            (1, 0.0, 0.0),
            (2, 0.0, 10.0),
            (3, 10.0, 10.0),
            (4, 10.0, 0.0),
            (5, 3.0, 3.0),
            (6, 3.0, 7.0),
            (7, 7.0, 7.0),
            (8, 7.0, 3.0),
        ]);
        let ways = vec![
            way(10, &[1, 2, 3, 4, 1], &[]),
            way(11, &[5, 6, 7, 8, 5], &[]),
        ];
        (ways, coords)
    }

    #[test]
    fn polygon_with_hole_and_rfc7946_winding() {
        let (ways, coords) = square_with_hole();
        let relation = multipolygon_relation(&[(10, "outer"), (11, "inner")]);

        let geometry = assemble_multipolygon(&relation, &ways, &coords).unwrap();
        let Geometry::Polygon { coordinates } = geometry else {
            panic!("expected Polygon, got {geometry:?}");
        };
        assert_eq!(coordinates.len(), 2);

        let (outer, hole) = (&coordinates[0], &coordinates[1]);
        assert!(signed_area(outer) > 0.0, "exterior must wind CCW");
        assert!(signed_area(hole) < 0.0, "hole must wind CW");
        assert!(point_in_ring(hole[0], outer), "hole must sit inside its outer");
    }

    #[test]
    fn empty_role_counts_as_outer() {
        let (ways, coords) = square_with_hole();
        let relation = multipolygon_relation(&[(10, ""), (11, "inner")]);
        let geometry = assemble_multipolygon(&relation, &ways, &coords).unwrap();
        assert!(matches!(geometry, Geometry::Polygon { .. }));
    }

    #[test]
    fn split_outer_ways_are_spliced() {
        let coords = cache(&[
            (1, 0.0, 0.0),
            (2, 0.0, 10.0),
            (3, 10.0, 10.0),
            (4, 10.0, 0.0),
        ]);
        // Two half-rings; the second runs backwards so splicing must reverse it.
        let ways = vec![way(20, &[1, 2, 3], &[]), way(21, &[1, 4, 3], &[])];
        let relation = multipolygon_relation(&[(20, "outer"), (21, "outer")]);

        let geometry = assemble_multipolygon(&relation, &ways, &coords).unwrap();
        let Geometry::Polygon { coordinates } = geometry else {
            panic!("expected Polygon");
        };
        assert_eq!(coordinates.len(), 1);
        let ring = &coordinates[0];
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn two_outers_become_multipolygon() {
        let coords = cache(&[
            (1, 0.0, 0.0),
            (2, 0.0, 1.0),
            (3, 1.0, 1.0),
            (4, 1.0, 0.0),
            (5, 5.0, 5.0),
            (6, 5.0, 6.0),
            (7, 6.0, 6.0),
            (8, 6.0, 5.0),
        ]);
        let ways = vec![
            way(30, &[1, 2, 3, 4, 1], &[]),
            way(31, &[5, 6, 7, 8, 5], &[]),
        ];
        let relation = multipolygon_relation(&[(30, "outer"), (31, "outer")]);

        let geometry = assemble_multipolygon(&relation, &ways, &coords).unwrap();
        let Geometry::MultiPolygon { coordinates } = geometry else {
            panic!("expected MultiPolygon");
        };
        assert_eq!(coordinates.len(), 2);
    }

    #[test]
    fn hole_goes_to_smallest_containing_outer() {
        let coords = cache(&[
            // Big square 0..20
            (1, 0.0, 0.0),
            (2, 0.0, 20.0),
            (3, 20.0, 20.0),
            (4, 20.0, 0.0),
            // Medium square 1..15
            (5, 1.0, 1.0),
            (6, 1.0, 15.0),
            (7, 15.0, 15.0),
            (8, 15.0, 1.0),
            // Inner square 3..7
            (9, 3.0, 3.0),
            (10, 3.0, 7.0),
            (11, 7.0, 7.0),
            (12, 7.0, 3.0),
        ]);
        let ways = vec![
            way(40, &[1, 2, 3, 4, 1], &[]),
            way(41, &[5, 6, 7, 8, 5], &[]),
            way(42, &[9, 10, 11, 12, 9], &[]),
        ];
        let relation =
            multipolygon_relation(&[(40, "outer"), (41, "outer"), (42, "inner")]);

        let geometry = assemble_multipolygon(&relation, &ways, &coords).unwrap();
        let Geometry::MultiPolygon { coordinates } = geometry else {
            panic!("expected MultiPolygon");
        };
        // The medium outer (built second) owns the hole; the big one does not.
        assert_eq!(coordinates[0].len(), 1);
        assert_eq!(coordinates[1].len(), 2);
    }

    #[test]
    fn non_multipolygon_relation_is_none() {
        let (ways, coords) = square_with_hole();
        let mut relation = multipolygon_relation(&[(10, "outer")]);
        relation.tags = [("type", "route")].into_iter().collect();
        assert!(assemble_multipolygon(&relation, &ways, &coords).is_none());
    }

    #[test]
    fn unclosable_ways_are_discarded_and_counted() {
        let coords = cache(&[(1, 0.0, 0.0), (2, 0.0, 10.0), (3, 10.0, 10.0)]);
        // An open chain that nothing closes.
        let ways = vec![way(50, &[1, 2, 3], &[])];
        let relation = multipolygon_relation(&[(50, "outer")]);

        let mut assembler = MultipolygonAssembler::new(&ways, &coords);
        assert!(assembler.assemble(&relation).is_none());
        assert_eq!(assembler.stats().unclosed_rings, 1);
    }

    #[test]
    fn uncontained_inner_is_discarded_and_counted() {
        let coords = cache(&[
            (1, 0.0, 0.0),
            (2, 0.0, 1.0),
            (3, 1.0, 1.0),
            (4, 1.0, 0.0),
            // Far away from the outer.
            (5, 50.0, 50.0),
            (6, 50.0, 51.0),
            (7, 51.0, 51.0),
            (8, 51.0, 50.0),
        ]);
        let ways = vec![
            way(60, &[1, 2, 3, 4, 1], &[]),
            way(61, &[5, 6, 7, 8, 5], &[]),
        ];
        let relation = multipolygon_relation(&[(60, "outer"), (61, "inner")]);

        let mut assembler = MultipolygonAssembler::new(&ways, &coords);
        let geometry = assembler.assemble(&relation).unwrap();
        let Geometry::Polygon { coordinates } = geometry else {
            panic!("expected Polygon");
        };
        assert_eq!(coordinates.len(), 1, "stray inner must not attach");
        assert_eq!(assembler.stats().uncontained_inners, 1);
    }
}

#[cfg(test)]
mod end_to_end {
    use osm_parse::parse_bytes;

    use crate::multipolygon::assemble_multipolygon;
    use crate::Geometry;

    /// Square with a hole, driven from real XML with relations enabled.
    #[test]
    fn multipolygon_from_xml() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="0.0" lon="0.0"/>
  <node id="2" lat="10.0" lon="0.0"/>
  <node id="3" lat="10.0" lon="10.0"/>
  <node id="4" lat="0.0" lon="10.0"/>
  <node id="5" lat="3.0" lon="3.0"/>
  <node id="6" lat="7.0" lon="3.0"/>
  <node id="7" lat="7.0" lon="7.0"/>
  <node id="8" lat="3.0" lon="7.0"/>
  <way id="10"><nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/></way>
  <way id="11"><nd ref="5"/><nd ref="6"/><nd ref="7"/><nd ref="8"/><nd ref="5"/></way>
  <relation id="100">
    <member type="way" ref="10" role="outer"/>
    <member type="way" ref="11" role="inner"/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>"#;
        let store = parse_bytes(doc.as_bytes(), true);
        assert_eq!(store.relations.len(), 1);

        let geometry =
            assemble_multipolygon(&store.relations[0], &store.ways, &store.coords).unwrap();
        let Geometry::Polygon { coordinates } = geometry else {
            panic!("expected Polygon");
        };
        assert_eq!(coordinates.len(), 2);
        assert!(osm_core::geo::signed_area(&coordinates[0]) > 0.0);
        assert!(osm_core::geo::signed_area(&coordinates[1]) < 0.0);
    }
}

#[cfg(test)]
mod features {
    use osm_core::{GeoPoint, NodeId, TagMap};
    use osm_parse::Node;

    use super::helpers::{cache, way};
    use crate::features::extract_features;
    use crate::Geometry;

    fn node(id: i64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> Node {
        Node {
            id: NodeId(id),
            point: GeoPoint::new(lat, lon),
            tags: tags.iter().copied().collect::<TagMap>(),
        }
    }

    #[test]
    fn amenity_points() {
        let nodes = vec![
            node(1, 51.5, -0.1, &[("amenity", "cafe"), ("name", "Corner Cafe")]),
            node(2, 51.5, -0.2, &[("amenity", "nonsense_value")]),
            node(3, 51.5, -0.3, &[("shop", "bakery")]),
        ];
        let set = extract_features(&nodes, &[], &cache(&[]));
        assert_eq!(set.amenities.len(), 1);
        let cafe = &set.amenities[0];
        assert_eq!(cafe.subtype, "cafe");
        assert_eq!(cafe.name.as_deref(), Some("Corner Cafe"));
        assert_eq!(cafe.geometry, Geometry::point(-0.1, 51.5));
        assert_eq!(cafe.properties.get("name"), Some("Corner Cafe"));
    }

    #[test]
    fn highway_lines_with_derived_measures() {
        let coords = cache(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0)]);
        let ways = vec![way(
            10,
            &[1, 2, 3],
            &[("highway", "residential"), ("name", "Equator Road")],
        )];
        let set = extract_features(&[], &ways, &coords);
        assert_eq!(set.highways.len(), 1);
        let road = &set.highways[0];
        assert!(matches!(road.geometry, Geometry::LineString { .. }));

        let length: f64 = road.properties.get("length_m").unwrap().parse().unwrap();
        assert!((length - 222_390.0).abs() < 1_000.0);
        let sinuosity: f64 = road.properties.get("sinuosity").unwrap().parse().unwrap();
        assert!((sinuosity - 1.0).abs() < 0.01);
    }

    #[test]
    fn building_polygons_are_closed_with_area() {
        // Open ring; extraction must close it.
        let coords = cache(&[(1, 0.0, 0.0), (2, 0.009, 0.0), (3, 0.009, 0.009), (4, 0.0, 0.009)]);
        let ways = vec![way(20, &[1, 2, 3, 4], &[("building", "yes")])];
        let set = extract_features(&[], &ways, &coords);
        assert_eq!(set.buildings.len(), 1);

        let Geometry::Polygon { coordinates } = &set.buildings[0].geometry else {
            panic!("expected Polygon");
        };
        let ring = &coordinates[0];
        assert_eq!(ring.first(), ring.last());

        let area: f64 = set.buildings[0].properties.get("area_sqm").unwrap().parse().unwrap();
        assert!((900_000.0..1_100_000.0).contains(&area), "got {area}");
    }

    #[test]
    fn ways_with_unresolvable_geometry_are_skipped() {
        // Node 99 never appears in the cache.
        let coords = cache(&[(1, 0.0, 0.0)]);
        let ways = vec![way(30, &[1, 99], &[("highway", "service")])];
        let set = extract_features(&[], &ways, &coords);
        assert!(set.highways.is_empty());
    }

    #[test]
    fn geojson_wire_shape() {
        let nodes = vec![node(1, 51.5, -0.1, &[("amenity", "cafe")])];
        let set = extract_features(&nodes, &[], &cache(&[]));
        let json = serde_json::to_value(&set.amenities[0].geometry).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], -0.1);
        assert_eq!(json["coordinates"][1], 51.5);
    }
}
