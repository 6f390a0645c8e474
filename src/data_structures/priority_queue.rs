use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use num_traits::Float;
use ordered_float::OrderedFloat;

/// An entry of an [`IndexedMinHeap`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeapEntry<K, P> {
    pub key: K,
    pub priority: P,
}

/// Binary min-heap with a key -> slot index, supporting decrease-key.
///
/// - `insert`, `extract_min`, `decrease_key`: O(log n)
/// - `contains`: O(1)
///
/// Entries with equal priority come out in heap order, which callers must not
/// rely on for correctness.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap<K, P>
where
    K: Eq + Hash + Copy + Debug,
    P: Float + Debug,
{
    heap: Vec<HeapEntry<K, P>>,
    positions: HashMap<K, usize>,
}

impl<K, P> IndexedMinHeap<K, P>
where
    K: Eq + Hash + Copy + Debug,
    P: Float + Debug,
{
    /// Creates a new empty priority queue
    pub fn new() -> Self {
        IndexedMinHeap {
            heap: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        IndexedMinHeap {
            heap: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Returns true if the priority queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of elements in the priority queue
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Current priority of a key, if present
    pub fn priority(&self, key: &K) -> Option<P> {
        self.positions.get(key).map(|&idx| self.heap[idx].priority)
    }

    /// Inserts a key. A key that is already present is treated as a
    /// [`decrease_key`](Self::decrease_key).
    pub fn insert(&mut self, key: K, priority: P) {
        if self.contains(&key) {
            self.decrease_key(key, priority);
            return;
        }
        self.heap.push(HeapEntry { key, priority });
        let idx = self.heap.len() - 1;
        self.positions.insert(key, idx);
        self.bubble_up(idx);
    }

    /// Removes and returns the entry with the smallest priority
    pub fn extract_min(&mut self) -> Option<HeapEntry<K, P>> {
        if self.heap.is_empty() {
            return None;
        }

        let min = self.heap.swap_remove(0);
        self.positions.remove(&min.key);

        if let Some(first) = self.heap.first() {
            self.positions.insert(first.key, 0);
            self.bubble_down(0);
        }

        Some(min)
    }

    /// Returns the entry with the smallest priority without removing it
    pub fn peek(&self) -> Option<HeapEntry<K, P>> {
        self.heap.first().copied()
    }

    /// Lowers the priority of `key`. No-op if the key is absent or the new
    /// priority is not strictly smaller.
    pub fn decrease_key(&mut self, key: K, priority: P) {
        let Some(&idx) = self.positions.get(&key) else {
            return;
        };
        if priority < self.heap[idx].priority {
            self.heap[idx].priority = priority;
            self.bubble_up(idx);
        }
    }

    /// All entries sorted ascending by priority, for display only
    pub fn snapshot_ordered(&self) -> Vec<HeapEntry<K, P>> {
        let mut entries = self.heap.clone();
        entries.sort_by_key(|entry| OrderedFloat(entry.priority));
        entries
    }

    /// Clears the priority queue
    pub fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    fn bubble_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[parent].priority <= self.heap[idx].priority {
                break;
            }
            self.swap(idx, parent);
            idx = parent;
        }
    }

    fn bubble_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.positions.insert(self.heap[i].key, i);
        self.positions.insert(self.heap[j].key, j);
    }
}

impl<K, P> Default for IndexedMinHeap<K, P>
where
    K: Eq + Hash + Copy + Debug,
    P: Float + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every key's recorded slot holds that key, and the heap property holds
    fn assert_consistent(heap: &IndexedMinHeap<usize, f64>) {
        assert_eq!(heap.positions.len(), heap.heap.len());
        for (key, &idx) in &heap.positions {
            assert_eq!(heap.heap[idx].key, *key);
        }
        for idx in 1..heap.heap.len() {
            assert!(heap.heap[(idx - 1) / 2].priority <= heap.heap[idx].priority);
        }
    }

    #[test]
    fn test_positions_stay_in_sync() {
        let mut heap = IndexedMinHeap::new();
        for (key, priority) in [(0, 9.0), (1, 3.0), (2, 7.0), (3, 1.0), (4, 5.0), (5, f64::INFINITY)] {
            heap.insert(key, priority);
            assert_consistent(&heap);
        }
        heap.decrease_key(5, 0.5);
        assert_consistent(&heap);
        heap.extract_min();
        assert_consistent(&heap);
        heap.decrease_key(0, 2.0);
        assert_consistent(&heap);
    }

    #[test]
    fn test_insert_existing_key_decreases() {
        let mut heap = IndexedMinHeap::new();
        heap.insert(1, 5.0);
        heap.insert(1, 8.0);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.priority(&1), Some(5.0));
        heap.insert(1, 2.0);
        assert_eq!(heap.priority(&1), Some(2.0));
    }
}
