//! Strongly typed, zero-cost identifier wrappers.
//!
//! OSM carries element IDs as decimal text; they are parsed once at scan time
//! and live as `i64` from then on.  All IDs are `Copy + Ord + Hash` so they
//! can be used as map keys and sorted collection elements without ceremony.
//! The inner integer is `pub` for direct arithmetic, but most call sites go
//! through the cache and store APIs.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `i64::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The raw OSM identifier.
            #[inline(always)]
            pub fn raw(self) -> $inner {
                self.0
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> Self {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of an OSM node (point element).
    pub struct NodeId(i64);
}

typed_id! {
    /// Identifier of an OSM way (ordered node-reference list).
    pub struct WayId(i64);
}

typed_id! {
    /// Identifier of an OSM relation (typed member grouping).
    pub struct RelationId(i64);
}
