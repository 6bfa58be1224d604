//! The composite filter stack.

use osm_core::NodeId;
use osm_parse::{ElementStore, Node, Relation, Way};
use rustc_hash::FxHashSet;

use crate::rule::{ElementKind, FilterRule, TagFilter};

// ── BoundingBoxFilter ─────────────────────────────────────────────────────────

/// Inclusive geographic bounding box.  Applies only to elements that carry
/// coordinates, i.e. nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBoxFilter {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl BoundingBoxFilter {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self { top, left, bottom, right }
    }

    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        osm_core::geo::point_in_bbox(lat, lon, self.top, self.left, self.bottom, self.right)
    }
}

// ── UsedNodeTracker ───────────────────────────────────────────────────────────

/// Collects the union of node references across a set of ways, then answers
/// membership queries.  Must be fed *after* way filtering so the node list
/// shrinks to exactly the nodes the surviving ways use.
#[derive(Clone, Debug, Default)]
pub struct UsedNodeTracker {
    used: FxHashSet<NodeId>,
}

impl UsedNodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect_from_ways<'a>(&mut self, ways: impl IntoIterator<Item = &'a Way>) {
        for way in ways {
            self.used.extend(way.node_refs.iter().copied());
        }
    }

    #[inline]
    pub fn is_used(&self, id: NodeId) -> bool {
        self.used.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}

// ── OsmFilter ─────────────────────────────────────────────────────────────────

/// Composite filter: global rejection, bounding box, tag rules, used-node
/// post-pass, applied in that order.
#[derive(Clone, Debug, Default)]
pub struct OsmFilter {
    pub tag_filter: TagFilter,
    pub bbox: Option<BoundingBoxFilter>,
    pub reject_nodes: bool,
    pub reject_ways: bool,
    pub reject_relations: bool,
    used_node_mode: bool,
}

impl OsmFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_accept(&mut self, kind: ElementKind, key: &str, value: &str) {
        self.tag_filter.add_accept(kind, key, value);
    }

    pub fn add_reject(&mut self, kind: ElementKind, key: &str, value: &str) {
        self.tag_filter.add_reject(kind, key, value);
    }

    /// Add a rule in the Osmosis textual form (`[accept:|reject:]key=value`).
    /// Returns `false` when the string does not parse.
    pub fn add_osmosis(&mut self, spec: &str) -> bool {
        match FilterRule::parse_osmosis(spec) {
            Some(rule) => {
                self.tag_filter.push(rule);
                true
            }
            None => false,
        }
    }

    pub fn set_bounding_box(&mut self, top: f64, left: f64, bottom: f64, right: f64) {
        self.bbox = Some(BoundingBoxFilter::new(top, left, bottom, right));
    }

    /// After filtering, keep only nodes referenced by a surviving way.
    pub fn enable_used_node_mode(&mut self) {
        self.used_node_mode = true;
    }

    pub fn used_node_mode(&self) -> bool {
        self.used_node_mode
    }

    pub fn set_global_rejection(&mut self, nodes: bool, ways: bool, relations: bool) {
        self.reject_nodes = nodes;
        self.reject_ways = ways;
        self.reject_relations = relations;
    }

    /// `true` when any predicate is configured.  Lets callers skip the
    /// filtering pass entirely.
    pub fn has_active_filters(&self) -> bool {
        self.tag_filter.has_rules()
            || self.reject_nodes
            || self.reject_ways
            || self.reject_relations
            || self.bbox.is_some()
    }

    // ── Per-element predicates ────────────────────────────────────────────

    /// Global rejection, bounding box, then tag rules.  The used-node pass
    /// is separate because it depends on the filtered way set.
    pub fn should_include_node(&self, node: &Node) -> bool {
        if self.reject_nodes {
            return false;
        }
        if let Some(bbox) = &self.bbox {
            if !bbox.contains(node.point.lat, node.point.lon) {
                return false;
            }
        }
        self.tag_filter.matches(ElementKind::Nodes, &node.tags).unwrap_or(true)
    }

    pub fn should_include_way(&self, way: &Way) -> bool {
        if self.reject_ways {
            return false;
        }
        self.tag_filter.matches(ElementKind::Ways, &way.tags).unwrap_or(true)
    }

    pub fn should_include_relation(&self, relation: &Relation) -> bool {
        if self.reject_relations {
            return false;
        }
        self.tag_filter.matches(ElementKind::Relations, &relation.tags).unwrap_or(true)
    }

    // ── Store application ─────────────────────────────────────────────────

    /// Filter a parsed store, consuming and returning it.
    ///
    /// The coordinate cache is never filtered: downstream geometry always
    /// resolves through the full cache, whatever the element filters keep.
    pub fn apply(&self, mut store: ElementStore) -> ElementStore {
        if !self.has_active_filters() && !self.used_node_mode {
            return store;
        }

        store.ways.retain(|w| self.should_include_way(w));
        store.relations.retain(|r| self.should_include_relation(r));
        store.nodes.retain(|n| self.should_include_node(n));

        if self.used_node_mode {
            let mut tracker = UsedNodeTracker::new();
            tracker.collect_from_ways(&store.ways);
            store.nodes.retain(|n| tracker.is_used(n.id));
        }

        store
    }
}
