//! Aggregation tables: item → weight, optionally nested under a partition key.
//! Both levels grow only through `add`; lookups never create entries.

use ahash::AHashMap;

pub type Weight = u64;

#[derive(Clone, Debug, Default)]
pub struct FlatTable {
    counts: AHashMap<String, Weight>,
}

impl FlatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-increment. Returns the item's new weight, or `None` with the table
    /// unchanged when the sum would overflow.
    #[must_use]
    pub fn add(&mut self, item: &str, weight: Weight) -> Option<Weight> {
        if let Some(w) = self.counts.get_mut(item) {
            *w = w.checked_add(weight)?;
            Some(*w)
        } else {
            self.counts.insert(item.to_owned(), weight);
            Some(weight)
        }
    }

    pub fn get(&self, item: &str) -> Option<Weight> {
        self.counts.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> Weight {
        self.counts.values().fold(0, |acc, w| acc.saturating_add(*w))
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Weight)> {
        self.counts.into_iter().collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PartitionedTable {
    parts: AHashMap<String, FlatTable>,
}

impl PartitionedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-increment under `key`, creating the partition on first use.
    #[must_use]
    pub fn add(&mut self, key: &str, item: &str, weight: Weight) -> Option<Weight> {
        if let Some(part) = self.parts.get_mut(key) {
            part.add(item, weight)
        } else {
            let mut part = FlatTable::new();
            let w = part.add(item, weight);
            self.parts.insert(key.to_owned(), part);
            w
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlatTable> {
        self.parts.get(key)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Drain partitions in ascending key order.
    pub fn into_sorted_parts(self) -> Vec<(String, FlatTable)> {
        let mut parts: Vec<_> = self.parts.into_iter().collect();
        parts.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        parts
    }
}

/// The per-file table, shaped by whether partitioning is on.
#[derive(Clone, Debug)]
pub enum Aggregation {
    Flat(FlatTable),
    Partitioned(PartitionedTable),
}
