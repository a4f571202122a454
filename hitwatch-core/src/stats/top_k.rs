use ahash::RandomState;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum TopKError {
    #[error("top-k tracker is empty")]
    Empty,
}

/// Indexed binary max-heap keyed by `K`, ordered by count.
///
/// The position map lets an existing key be located in O(1), so both
/// "increment or insert" and non-destructive top-k retrieval stay logarithmic.
#[derive(Debug, Clone)]
pub struct TopKTracker<K> {
    entries: Vec<(K, u64)>,
    position: HashMap<K, usize, RandomState>,
}

impl<K> Default for TopKTracker<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TopKTracker<K>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            position: HashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `amount` to the count of `key`, inserting it with `amount` if unseen.
    pub fn increment(&mut self, key: K, amount: u64) {
        let idx = match self.position.get(&key) {
            Some(&idx) => {
                self.entries[idx].1 += amount;
                idx
            }
            None => {
                let idx = self.entries.len();
                self.position.insert(key.clone(), idx);
                self.entries.push((key, amount));
                idx
            }
        };

        self.restore(idx);
    }

    /// Returns up to `k` keys with the highest counts.
    ///
    /// Pops the maximum `k` times and re-inserts what was popped, so the tracker
    /// holds the same (key, count) set afterwards. Callers sharing the tracker
    /// must hold their lock across the whole call.
    pub fn top_k(&mut self, k: usize) -> HashMap<K, u64> {
        let mut popped = Vec::with_capacity(k.min(self.entries.len()));

        for _ in 0..k {
            match self.pop_max() {
                Ok(entry) => popped.push(entry),
                Err(TopKError::Empty) => break,
            }
        }

        let mut out = HashMap::with_capacity(popped.len());
        for (key, count) in popped {
            self.increment(key.clone(), count);
            out.insert(key, count);
        }

        out
    }

    /// Removes and returns the entry with the highest count.
    pub fn pop_max(&mut self) -> Result<(K, u64), TopKError> {
        if self.entries.is_empty() {
            return Err(TopKError::Empty);
        }

        let last = self.entries.len() - 1;
        self.swap(0, last);

        let (key, count) = self.entries.pop().ok_or(TopKError::Empty)?;
        self.position.remove(&key);

        if !self.entries.is_empty() {
            self.sift_down(0);
        }

        Ok((key, count))
    }

    /// Read-only view of the heap array, parent of `i` at `(i - 1) / 2`.
    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[(K, u64)] {
        &self.entries
    }

    /// Heap slot recorded for `key` in the position map.
    #[cfg(test)]
    pub(crate) fn slot_of(&self, key: &K) -> Option<usize> {
        self.position.get(key).copied()
    }

    #[cfg(test)]
    pub(crate) fn tracked_keys(&self) -> usize {
        self.position.len()
    }

    // Only `idx` may violate the heap property when this is called.
    fn restore(&mut self, idx: usize) {
        if idx > 0 && self.entries[idx].1 > self.entries[parent(idx)].1 {
            self.sift_up(idx);
        } else {
            self.sift_down(idx);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let p = parent(idx);
            if self.entries[idx].1 <= self.entries[p].1 {
                break;
            }
            self.swap(idx, p);
            idx = p;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();

        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let child = if right < len && self.entries[right].1 > self.entries[left].1 {
                right
            } else {
                left
            };

            if self.entries[child].1 <= self.entries[idx].1 {
                break;
            }
            self.swap(idx, child);
            idx = child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(slot) = self.position.get_mut(&self.entries[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.position.get_mut(&self.entries[b].0) {
            *slot = b;
        }
    }
}

fn parent(idx: usize) -> usize {
    (idx - 1) / 2
}
