//! Insertion-ordered counting
//!
//! Several analytics pick "the first key with the highest count". That only
//! means something when iteration order is the order keys were first seen, so
//! counts are folded into a vector-backed association instead of a hash map.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key to count association that iterates in first-insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCounts<K> {
    entries: Vec<(K, u32)>,
}

impl<K> Default for OrderedCounts<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> OrderedCounts<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `by` to `key`, appending the key if it has not been seen
    pub fn add(&mut self, key: K, by: u32) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += by,
            None => self.entries.push((key, by)),
        }
    }

    pub fn get(&self, key: &K) -> Option<u32> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    /// Key with the highest count; the earliest key wins ties
    pub fn first_max(&self) -> Option<(&K, u32)> {
        let mut best: Option<(&K, u32)> = None;
        for (key, count) in &self.entries {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Key with the lowest count; the earliest key wins ties
    pub fn first_min(&self) -> Option<(&K, u32)> {
        let mut best: Option<(&K, u32)> = None;
        for (key, count) in &self.entries {
            if best.map_or(true, |(_, low)| *count < low) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Entries ordered by count descending, ties kept in insertion order
    pub fn ranked(&self) -> Vec<(&K, u32)> {
        let mut ranked: Vec<(&K, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl<K> OrderedCounts<K> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.entries.iter().map(|(k, count)| (k, *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl<K: PartialEq> FromIterator<(K, u32)> for OrderedCounts<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut counts, (key, by)| {
            counts.add(key, by);
            counts
        })
    }
}

impl<K: Serialize> Serialize for OrderedCounts<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

struct OrderedCountsVisitor<K>(PhantomData<K>);

impl<'de, K: Deserialize<'de> + PartialEq> Visitor<'de> for OrderedCountsVisitor<K> {
    type Value = OrderedCounts<K>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of counts")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut counts = OrderedCounts::new();
        while let Some((key, count)) = access.next_entry::<K, u32>()? {
            counts.add(key, count);
        }
        Ok(counts)
    }
}

impl<'de, K: Deserialize<'de> + PartialEq> Deserialize<'de> for OrderedCounts<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedCountsVisitor(PhantomData))
    }
}
