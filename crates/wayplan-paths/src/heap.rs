//! Array-backed binary min-heap keyed by `f32` priority.
//!
//! The performance-critical primitive under every search planner's open set.
//! `push`/`pop` allocate nothing beyond the amortized backing-array resize;
//! [`clear`](MinHeap::clear) retains the backing storage so a planner can
//! reuse one heap across searches.

/// Starting capacity; keeps short searches from resizing at all.
const INITIAL_CAPACITY: usize = 16;

struct Entry<T> {
    key: f32,
    item: T,
}

/// A min-heap of items keyed by `f32` priority.
///
/// Invariant: `key(parent(i)) <= key(i)` for every non-root index `i`.
/// Ties between equal keys are broken arbitrarily; there is no stability
/// guarantee. Keys must not be NaN.
pub struct MinHeap<T> {
    entries: Vec<Entry<T>>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Number of items held.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity of the backing array. Grows by doubling, never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Remove all items without releasing the backing storage.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Key of the minimum item, if any.
    #[inline]
    pub fn peek_key(&self) -> Option<f32> {
        self.entries.first().map(|e| e.key)
    }

    /// Insert `item` with priority `key`. O(log n).
    pub fn push(&mut self, key: f32, item: T) {
        self.entries.push(Entry { key, item });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the minimum-key item. O(log n).
    pub fn pop(&mut self) -> Option<(T, f32)> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let entry = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.item, entry.key))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].key < self.entries[parent].key {
                self.entries.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.entries[left].key < self.entries[smallest].key {
                smallest = left;
            }
            if right < len && self.entries[right].key < self.entries[smallest].key {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn pop_on_empty_returns_none() {
        let mut h: MinHeap<u32> = MinHeap::new();
        assert!(h.is_empty());
        assert_eq!(h.pop().map(|(i, _)| i), None);
    }

    #[test]
    fn pops_in_key_order() {
        let mut h = MinHeap::new();
        h.push(3.0, "c");
        h.push(1.0, "a");
        h.push(2.0, "b");
        assert_eq!(h.pop(), Some(("a", 1.0)));
        assert_eq!(h.pop(), Some(("b", 2.0)));
        assert_eq!(h.pop(), Some(("c", 3.0)));
        assert_eq!(h.pop(), None);
    }

    /// Every pop must return the minimum key among currently-held elements,
    /// verified against a shadow sorted list under random interleaving.
    #[test]
    fn matches_shadow_multiset() {
        let mut rng = rand::rng();
        let mut h = MinHeap::new();
        let mut shadow: Vec<f32> = Vec::new();

        for _ in 0..2000 {
            if shadow.is_empty() || rng.random_range(0..3) > 0 {
                let key: f32 = rng.random_range(0.0..1000.0);
                h.push(key, key);
                shadow.push(key);
            } else {
                let (item, key) = h.pop().unwrap();
                assert_eq!(item, key);
                let min = shadow
                    .iter()
                    .cloned()
                    .fold(f32::INFINITY, f32::min);
                assert_eq!(key, min);
                let pos = shadow.iter().position(|&v| v == min).unwrap();
                shadow.swap_remove(pos);
            }
            assert_eq!(h.len(), shadow.len());
        }

        while let Some((_, key)) = h.pop() {
            let min = shadow.iter().cloned().fold(f32::INFINITY, f32::min);
            assert_eq!(key, min);
            let pos = shadow.iter().position(|&v| v == min).unwrap();
            shadow.swap_remove(pos);
        }
        assert!(shadow.is_empty());
    }

    #[test]
    fn count_returns_to_zero() {
        let mut h = MinHeap::new();
        for i in 0..100 {
            h.push(i as f32, i);
        }
        assert_eq!(h.len(), 100);
        for _ in 0..100 {
            h.pop();
        }
        assert_eq!(h.len(), 0);
        assert!(h.is_empty());
    }

    #[test]
    fn clear_retains_storage_and_correctness() {
        let mut h = MinHeap::new();
        for i in 0..64 {
            h.push((64 - i) as f32, i);
        }
        let cap = h.capacity();
        h.clear();
        assert_eq!(h.len(), 0);
        assert_eq!(h.capacity(), cap);

        h.push(2.0, 20);
        h.push(1.0, 10);
        assert_eq!(h.pop(), Some((10, 1.0)));
        assert_eq!(h.pop(), Some((20, 2.0)));
    }

    #[test]
    fn starts_with_small_constant_capacity() {
        let h: MinHeap<u64> = MinHeap::new();
        assert!(h.capacity() >= 16);
    }
}
