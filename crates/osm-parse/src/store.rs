//! Owned OSM element collections and the parse report.
//!
//! # Two views of node coordinates
//!
//! The coordinate cache and the tagged-node list are distinct on purpose.
//! The cache covers **every** node the file contained, tagged or not — ways
//! reference plain geometry nodes constantly, and the routing graph builder
//! resolves segment endpoints through the cache.  The node list holds only
//! nodes that carry at least one tag, which is what feature extraction
//! wants.  Conflating the two starves downstream consumers of geometry.

use osm_core::{GeoPoint, NodeId, RelationId, TagMap, WayId};
use rustc_hash::FxHashMap;

/// Map of every node ID seen in the source file to its coordinate.
pub type CoordCache = FxHashMap<NodeId, GeoPoint>;

// ── Elements ──────────────────────────────────────────────────────────────────

/// A tagged OSM node.  Untagged nodes exist only in the [`CoordCache`].
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub point: GeoPoint,
    pub tags: TagMap,
}

/// An OSM way: an ordered list of node references plus tags.
#[derive(Clone, Debug)]
pub struct Way {
    pub id: WayId,
    pub node_refs: Vec<NodeId>,
    pub tags: TagMap,
}

impl Way {
    /// A way is closed when it has at least four references and its first
    /// and last reference coincide.
    pub fn is_closed(&self) -> bool {
        self.node_refs.len() >= 4 && self.node_refs.first() == self.node_refs.last()
    }

    /// A closed way tagged with any of the area-indicating keys.
    pub fn is_area(&self) -> bool {
        const AREA_KEYS: [&str; 8] = [
            "building", "landuse", "natural", "area", "leisure", "amenity", "shop", "tourism",
        ];
        self.is_closed() && AREA_KEYS.iter().any(|k| self.tags.contains_key(k))
    }
}

/// Kind of element a relation member points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}

/// One member entry of a relation, in document order.
#[derive(Clone, Debug)]
pub struct Member {
    pub kind: MemberKind,
    /// Raw referenced ID; interpret according to `kind`.
    pub ref_id: i64,
    pub role: Box<str>,
}

impl Member {
    /// The referenced way, if this member is a way.
    pub fn way_ref(&self) -> Option<WayId> {
        (self.kind == MemberKind::Way).then(|| WayId(self.ref_id))
    }
}

/// An OSM relation: typed members with roles, plus tags.
#[derive(Clone, Debug)]
pub struct Relation {
    pub id: RelationId,
    pub members: Vec<Member>,
    pub tags: TagMap,
}

impl Relation {
    pub fn members_by_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Member> {
        self.members.iter().filter(move |m| m.role.as_ref() == role)
    }
}

// ── Bounds and report ─────────────────────────────────────────────────────────

/// The `<bounds>` element of an extract, when present.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Counters describing one parse run.
#[derive(Clone, Debug, Default)]
pub struct ParseReport {
    pub bytes_scanned: u64,
    /// Nodes seen in the file, tagged or not (cache insertions, including
    /// duplicate overwrites).
    pub nodes_seen: u64,
    pub tagged_nodes: u64,
    pub ways: u64,
    pub relations_seen: u64,
    /// Elements or children skipped because a required attribute was missing
    /// or unparseable.
    pub malformed_skipped: u64,
    /// Same-kind elements that re-used an earlier ID (last write wins).
    pub duplicate_overwrites: u64,
    pub bounds: Option<Bounds>,
    pub elapsed: std::time::Duration,
}

// ── ElementStore ──────────────────────────────────────────────────────────────

/// Frozen result of one parse: element collections, coordinate cache, report.
///
/// `relations` is empty unless the store was produced by
/// [`crate::parse_with_relations`].
#[derive(Debug, Default)]
pub struct ElementStore {
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
    pub relations: Vec<Relation>,
    pub coords: CoordCache,
    pub report: ParseReport,
}

impl ElementStore {
    /// Look up a way by ID (linear scan; the store keeps document order).
    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.iter().find(|w| w.id == id)
    }
}

// ── StoreBuilder ──────────────────────────────────────────────────────────────

/// Accumulates scanner output; `finish` freezes it into an [`ElementStore`].
///
/// Duplicate IDs within one file follow last-write-wins: the earlier element
/// is replaced in place so document order is preserved.
pub(crate) struct StoreBuilder {
    keep_relations: bool,
    nodes: Vec<Node>,
    node_index: FxHashMap<NodeId, usize>,
    ways: Vec<Way>,
    way_index: FxHashMap<WayId, usize>,
    relations: Vec<Relation>,
    relation_index: FxHashMap<RelationId, usize>,
    coords: CoordCache,
    report: ParseReport,
    warned: bool,
}

impl StoreBuilder {
    pub(crate) fn new(keep_relations: bool) -> Self {
        Self {
            keep_relations,
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
            ways: Vec::new(),
            way_index: FxHashMap::default(),
            relations: Vec::new(),
            relation_index: FxHashMap::default(),
            coords: CoordCache::default(),
            report: ParseReport::default(),
            warned: false,
        }
    }

    pub(crate) fn keep_relations(&self) -> bool {
        self.keep_relations
    }

    pub(crate) fn add_node(&mut self, id: NodeId, point: GeoPoint, tags: TagMap) {
        self.report.nodes_seen += 1;
        if self.coords.insert(id, point).is_some() {
            self.report.duplicate_overwrites += 1;
        }
        if tags.is_empty() {
            // Last write wins even when the rewrite is untagged: evict any
            // earlier tagged entry so the node list never carries a stale
            // point.
            if let Some(i) = self.node_index.remove(&id) {
                self.nodes.swap_remove(i);
                if let Some(moved) = self.nodes.get(i) {
                    self.node_index.insert(moved.id, i);
                }
            }
            return;
        }
        let node = Node { id, point, tags };
        match self.node_index.get(&id) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.node_index.insert(id, self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub(crate) fn add_way(&mut self, id: WayId, node_refs: Vec<NodeId>, tags: TagMap) {
        let way = Way { id, node_refs, tags };
        match self.way_index.get(&id) {
            Some(&i) => {
                self.ways[i] = way;
                self.report.duplicate_overwrites += 1;
            }
            None => {
                self.way_index.insert(id, self.ways.len());
                self.ways.push(way);
            }
        }
    }

    pub(crate) fn add_relation(&mut self, id: RelationId, members: Vec<Member>, tags: TagMap) {
        self.report.relations_seen += 1;
        if !self.keep_relations {
            return;
        }
        let relation = Relation { id, members, tags };
        match self.relation_index.get(&id) {
            Some(&i) => {
                self.relations[i] = relation;
                self.report.duplicate_overwrites += 1;
            }
            None => {
                self.relation_index.insert(id, self.relations.len());
                self.relations.push(relation);
            }
        }
    }

    pub(crate) fn set_bounds(&mut self, bounds: Bounds) {
        self.report.bounds = Some(bounds);
    }

    /// Record a skipped element or child.  Warns once per file so a damaged
    /// extract does not flood the log.
    pub(crate) fn note_malformed(&mut self, what: &str) {
        self.report.malformed_skipped += 1;
        if !self.warned {
            self.warned = true;
            log::warn!("malformed OSM XML ({what}); skipping and resynchronising");
        }
    }

    pub(crate) fn finish(mut self, bytes: u64, elapsed: std::time::Duration) -> ElementStore {
        self.report.bytes_scanned = bytes;
        self.report.tagged_nodes = self.nodes.len() as u64;
        self.report.ways = self.ways.len() as u64;
        self.report.elapsed = elapsed;
        ElementStore {
            nodes: self.nodes,
            ways: self.ways,
            relations: self.relations,
            coords: self.coords,
            report: self.report,
        }
    }
}
