//! `osm-filter` — composable element filtering.
//!
//! A predicate stack over a parsed [`ElementStore`], modelled on the Osmosis
//! accept/reject vocabulary.  Composition order is fixed: global rejection,
//! then bounding box, then tag rules, then the used-node post-pass.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`rule`]  | `FilterRule`, `FilterAction`, `ElementKind`, `TagFilter`   |
//! | [`stack`] | `BoundingBoxFilter`, `UsedNodeTracker`, `OsmFilter`        |

pub mod rule;
pub mod stack;


pub use osm_parse::ElementStore;
pub use rule::{ElementKind, FilterAction, FilterRule, TagFilter};
pub use stack::{BoundingBoxFilter, OsmFilter, UsedNodeTracker};
