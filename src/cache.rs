//! Direct-mapped computed table.
//!
//! Each key hashes to exactly one slot; a newer entry simply overwrites the
//! older one. Full keys are stored, so a lookup never returns the result of a
//! different operation.

use std::cell::Cell;

use crate::utils::MyHash;

struct Entry<K, V> {
    key: K,
    value: V,
}

pub struct Cache<K, V> {
    data: Vec<Option<Entry<K, V>>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Cache<K, V> {
    /// Create a new table of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let size = 1 << bits;
        let bitmask = (size - 1) as u64;

        Self {
            data: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Reset the cache.
    pub fn clear(&mut self) {
        self.data.fill_with(|| None);
    }

    fn index(&self, key: &K) -> usize
    where
        K: MyHash,
    {
        (key.hash() & self.bitmask) as usize
    }

    /// Get the cached result.
    pub fn get(&self, key: &K) -> Option<&V>
    where
        K: MyHash + Eq,
    {
        match &self.data[self.index(key)] {
            Some(entry) if &entry.key == key => {
                self.hits.set(self.hits.get() + 1);
                Some(&entry.value)
            }
            _ => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V)
    where
        K: MyHash,
    {
        let index = self.index(&key);
        self.data[index] = Some(Entry { key, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Eq, PartialEq)]
    struct Key(u64, u64);

    impl MyHash for Key {
        fn hash(&self) -> u64 {
            crate::utils::pairing2(self.0, self.1)
        }
    }

    #[test]
    fn test_cache() {
        let mut cache = Cache::<Key, i32>::new(3);

        cache.insert(Key(1, 2), 3);
        cache.insert(Key(2, 3), 1);

        assert_eq!(cache.get(&Key(1, 2)), Some(&3));
        assert_eq!(cache.get(&Key(2, 3)), Some(&1));
        assert_eq!(cache.get(&Key(2, 1)), None);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_collision_does_not_alias() {
        // With one slot every key collides.
        let mut cache = Cache::<Key, i32>::new(0);
        cache.insert(Key(1, 2), 3);
        assert_eq!(cache.get(&Key(2, 1)), None);
        cache.insert(Key(2, 1), 4);
        assert_eq!(cache.get(&Key(1, 2)), None);
        assert_eq!(cache.get(&Key(2, 1)), Some(&4));

        cache.clear();
        assert_eq!(cache.get(&Key(2, 1)), None);
    }
}
