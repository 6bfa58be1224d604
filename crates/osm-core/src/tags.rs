//! Flat key/value tag storage.
//!
//! # Design
//!
//! Tags are stored as a vector of `(key, value)` pairs kept sorted by key.
//! Typical OSM elements carry zero to a handful of tags; a hash map per
//! element would cost an allocation and hashing on every access for no
//! benefit.  `get` is a binary search, iteration is a contiguous scan, and
//! memory is two boxed strings per tag.
//!
//! Duplicate keys follow OSM file semantics: the last write wins.

/// Sorted flat map of OSM tags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagMap {
    entries: Vec<(Box<str>, Box<str>)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { entries: Vec::with_capacity(n) }
    }

    /// Insert a tag, replacing any existing value for the same key.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.binary_search_by(|(k, _)| k.as_ref().cmp(key)) {
            Ok(i) => self.entries[i].1 = value.into(),
            Err(i) => self.entries.insert(i, (key.into(), value.into())),
        }
    }

    /// Look up a tag value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|(k, _)| k.as_ref().cmp(key))
            .ok()
            .map(|i| self.entries[i].1.as_ref())
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tags = TagMap::new();
        for (k, v) in iter {
            tags.insert(k.as_ref(), v.as_ref());
        }
        tags
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TagMap {
    /// Serializes as a JSON object, which is what GeoJSON `properties` expect.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
