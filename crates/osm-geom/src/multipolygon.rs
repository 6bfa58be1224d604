//! Multipolygon geometry assembly from relation members.
//!
//! OSM multipolygons arrive as loose way segments with `outer`/`inner`
//! roles; the ways of one ring may appear in any order and any direction.
//! Assembly splices segments into closed rings, assigns each inner ring to
//! the smallest outer ring containing it, and enforces RFC 7946 winding
//! (exteriors CCW, holes CW).
//!
//! The splice loop is O(R²) in the number of member ways.  Real relations
//! rarely exceed dozens of rings; keep it simple.

use osm_core::geo::{ensure_winding, ring_contains_ring, signed_area};
use osm_core::{WayId, Winding};
use osm_parse::{CoordCache, MemberKind, Relation, Way};
use rustc_hash::FxHashMap;

use crate::geometry::Geometry;

/// Endpoint equality tolerance in degrees (~0.1 µm at the equator).
const JOIN_TOLERANCE: f64 = 1e-9;

/// Counters accumulated across `assemble` calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Splice chains that never closed; their ways were discarded.
    pub unclosed_rings: u64,
    /// Inner rings contained by no outer ring.
    pub uncontained_inners: u64,
}

/// Assembles multipolygon geometries against a way store and coordinate
/// cache.  Construct once per store and reuse across relations; resolved way
/// coordinates are cached between calls.
pub struct MultipolygonAssembler<'a> {
    way_index: FxHashMap<WayId, &'a Way>,
    coords: &'a CoordCache,
    coord_cache: FxHashMap<WayId, Vec<[f64; 2]>>,
    stats: AssemblyStats,
}

impl<'a> MultipolygonAssembler<'a> {
    pub fn new(ways: &'a [Way], coords: &'a CoordCache) -> Self {
        Self {
            way_index: ways.iter().map(|w| (w.id, w)).collect(),
            coords,
            coord_cache: FxHashMap::default(),
            stats: AssemblyStats::default(),
        }
    }

    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    /// Assemble one relation.  Returns `None` for relations that are not
    /// `type=multipolygon` or yield no closed outer ring.
    pub fn assemble(&mut self, relation: &Relation) -> Option<Geometry> {
        if relation.tags.get("type") != Some("multipolygon") {
            return None;
        }

        // Role partition: `outer` plus the empty role (a common tagging
        // shorthand for outer), versus `inner`.
        let mut outer_ways: Vec<WayId> = Vec::new();
        let mut inner_ways: Vec<WayId> = Vec::new();
        for member in &relation.members {
            if member.kind != MemberKind::Way {
                continue;
            }
            let id = WayId(member.ref_id);
            match member.role.as_ref() {
                "outer" | "" => outer_ways.push(id),
                "inner" => inner_ways.push(id),
                _ => {}
            }
        }

        let outer_rings = self.build_rings(&outer_ways);
        let inner_rings = self.build_rings(&inner_ways);

        if outer_rings.is_empty() {
            return None;
        }

        let mut polygons = self.assign_holes(outer_rings, inner_rings);

        for polygon in &mut polygons {
            ensure_winding(&mut polygon[0], Winding::Ccw);
            for hole in polygon.iter_mut().skip(1) {
                ensure_winding(hole, Winding::Cw);
            }
        }

        if polygons.len() == 1 {
            Some(Geometry::Polygon { coordinates: polygons.pop().unwrap() })
        } else {
            Some(Geometry::MultiPolygon { coordinates: polygons })
        }
    }

    /// Resolve a way to `[lon, lat]` coordinates through the cache, skipping
    /// references that never appeared in the source file.
    fn way_coords(&mut self, id: WayId) -> Option<Vec<[f64; 2]>> {
        if let Some(cached) = self.coord_cache.get(&id) {
            return (!cached.is_empty()).then(|| cached.clone());
        }
        let way = self.way_index.get(&id)?;
        let coords: Vec<[f64; 2]> = way
            .node_refs
            .iter()
            .filter_map(|r| self.coords.get(r))
            .map(|p| p.lon_lat())
            .collect();
        self.coord_cache.insert(id, coords.clone());
        (!coords.is_empty()).then_some(coords)
    }

    /// Splice member ways into closed rings.
    fn build_rings(&mut self, member_ways: &[WayId]) -> Vec<Vec<[f64; 2]>> {
        let segments: Vec<Vec<[f64; 2]>> = member_ways
            .iter()
            .filter_map(|&id| self.way_coords(id))
            .filter(|c| c.len() >= 2)
            .collect();

        let mut rings = Vec::new();
        let mut used = vec![false; segments.len()];

        for i in 0..segments.len() {
            if used[i] {
                continue;
            }
            used[i] = true;

            if is_closed(&segments[i]) {
                rings.push(segments[i].clone());
                continue;
            }

            // Grow the ring until no segment attaches or it closes.
            let mut ring = segments[i].clone();
            let mut changed = true;
            while changed && !is_closed(&ring) {
                changed = false;
                for (j, segment) in segments.iter().enumerate() {
                    if used[j] {
                        continue;
                    }
                    if let Some(joined) = try_join(&ring, segment) {
                        ring = joined;
                        used[j] = true;
                        changed = true;
                        break;
                    }
                }
            }

            if is_closed(&ring) {
                rings.push(ring);
            } else {
                self.stats.unclosed_rings += 1;
            }
        }

        rings
    }

    /// Attach each inner ring to the smallest outer ring that contains it.
    fn assign_holes(
        &mut self,
        outer_rings: Vec<Vec<[f64; 2]>>,
        inner_rings: Vec<Vec<[f64; 2]>>,
    ) -> Vec<Vec<Vec<[f64; 2]>>> {
        let mut polygons: Vec<Vec<Vec<[f64; 2]>>> =
            outer_rings.into_iter().map(|outer| vec![outer]).collect();

        for inner in inner_rings {
            let mut best: Option<(usize, f64)> = None;
            for (i, polygon) in polygons.iter().enumerate() {
                let outer = &polygon[0];
                if ring_contains_ring(outer, &inner) {
                    let area = signed_area(outer).abs();
                    if best.is_none_or(|(_, smallest)| area < smallest) {
                        best = Some((i, area));
                    }
                }
            }
            match best {
                Some((i, _)) => polygons[i].push(inner),
                None => self.stats.uncontained_inners += 1,
            }
        }

        polygons
    }
}

/// One-shot convenience wrapper.
pub fn assemble_multipolygon(
    relation: &Relation,
    ways: &[Way],
    coords: &CoordCache,
) -> Option<Geometry> {
    MultipolygonAssembler::new(ways, coords).assemble(relation)
}

// ── Splice helpers ────────────────────────────────────────────────────────────

#[inline]
fn coords_match(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < JOIN_TOLERANCE && (a[1] - b[1]).abs() < JOIN_TOLERANCE
}

fn is_closed(coords: &[[f64; 2]]) -> bool {
    coords.len() >= 3 && coords_match(coords[0], coords[coords.len() - 1])
}

/// Attempt the four endpoint-matching splices; the shared vertex is kept
/// once.
fn try_join(ring: &[[f64; 2]], other: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    if ring.is_empty() || other.is_empty() {
        return None;
    }
    let ring_start = ring[0];
    let ring_end = ring[ring.len() - 1];
    let other_start = other[0];
    let other_end = other[other.len() - 1];

    if coords_match(ring_end, other_start) {
        let mut joined = ring.to_vec();
        joined.extend_from_slice(&other[1..]);
        Some(joined)
    } else if coords_match(ring_end, other_end) {
        let mut joined = ring.to_vec();
        joined.extend(other[..other.len() - 1].iter().rev().copied());
        Some(joined)
    } else if coords_match(ring_start, other_end) {
        let mut joined = other[..other.len() - 1].to_vec();
        joined.extend_from_slice(ring);
        Some(joined)
    } else if coords_match(ring_start, other_start) {
        let mut joined: Vec<[f64; 2]> = other.iter().rev().copied().collect();
        joined.pop();
        joined.extend_from_slice(ring);
        Some(joined)
    } else {
        None
    }
}
