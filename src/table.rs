//! Budgeted unique table.
//!
//! Values live in a growable vector; a bucket array chains equal-hash values
//! so that [`Table::put`] returns the existing index for a value already
//! stored. The number of stored values never exceeds the budget: the first
//! insertion past it is refused.

use std::cmp::min;

use crate::utils::MyHash;

struct Entry<T> {
    value: T,
    next: usize,
}

pub struct Table<T> {
    /// Slot 0 is a sentinel: index 0 doubles as the end-of-chain marker.
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
    budget: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a table holding at most `budget` values, with `2^bucket_bits` buckets.
    pub fn new(budget: usize, bucket_bits: usize) -> Self {
        assert!(bucket_bits <= 31, "Bucket bits should be in the range 0..=31");

        let buckets_size = 1 << bucket_bits;
        let mut data = Vec::with_capacity(min(budget, 1 << 16) + 1);
        data.push(Entry {
            value: T::default(),
            next: 0,
        });

        Self {
            data,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            budget,
        }
    }
}

impl<T> Table<T> {
    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    /// Get the index of the next value in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }

    /// Append a value without hashing it. Returns `None` when the budget is exhausted.
    pub fn add(&mut self, value: T) -> Option<usize> {
        if self.len() >= self.budget {
            return None;
        }
        self.data.push(Entry { value, next: 0 });
        Some(self.data.len() - 1)
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Return the index of `value`, storing it first if it is new.
    ///
    /// Returns `None` when the value is new and the budget is exhausted.
    pub fn put(&mut self, value: T) -> Option<usize> {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            let i = self.add(value)?;
            self.buckets[bucket_index] = i;
            return Some(i);
        }

        loop {
            if &value == self.value(index) {
                return Some(index);
            }
            let next = self.next(index);
            if next == 0 {
                let i = self.add(value)?;
                self.data[index].next = i;
                return Some(i);
            }
            index = next;
        }
    }
}
