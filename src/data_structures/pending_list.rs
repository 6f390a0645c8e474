use std::fmt::Debug;

use num_traits::Float;
use ordered_float::OrderedFloat;

/// Distance-ordered work list holding at most one entry per key.
///
/// Re-sorted after every update. Inserting a key that is already pending
/// replaces its entry. Equal distances keep insertion order.
#[derive(Debug, Clone)]
pub struct PendingList<K, V>
where
    K: Eq + Copy + Debug,
    V: Float + Debug,
{
    entries: Vec<(K, V)>,
}

impl<K, V> PendingList<K, V>
where
    K: Eq + Copy + Debug,
    V: Float + Debug,
{
    pub fn new() -> Self {
        PendingList { entries: Vec::new() }
    }

    /// Checks if the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of pending keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Inserts or replaces the entry for `key`
    pub fn upsert(&mut self, key: K, value: V) {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, value));
        self.entries.sort_by_key(|&(_, v)| OrderedFloat(v));
    }

    /// Removes and returns the entry with the smallest value
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Pending keys, smallest value first
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|&(k, _)| k).collect()
    }
}

impl<K, V> Default for PendingList<K, V>
where
    K: Eq + Copy + Debug,
    V: Float + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
