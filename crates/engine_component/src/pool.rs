//! Growable slot storage with LIFO reuse of freed slots.
//!
//! A [`SlotPool`] never shrinks or compacts: destroying a slot only pushes its
//! index onto the free list, and the stored value stays in place until the
//! slot is handed out again. Slot indices therefore stay valid for as long as
//! the owner keeps them allocated.

/// Index of a slot inside a [`SlotPool`].
pub type SlotIndex = u32;

/// A growable array of values plus a free list of released slot indices.
///
/// Every index on the free list is unreferenced by its owner; every other index
/// below [`SlotPool::capacity`] holds a live value.
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    objects: Vec<T>,
    cache: Vec<SlotIndex>,
}

impl<T> SlotPool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            cache: Vec::new(),
        }
    }

    /// Create an empty pool with room for `capacity` values before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
            cache: Vec::new(),
        }
    }

    /// Returns the index the next allocation will hand out.
    #[must_use]
    pub fn next_index(&self) -> SlotIndex {
        self.cache
            .last()
            .copied()
            .unwrap_or(self.objects.len() as SlotIndex)
    }

    /// Allocate a slot holding `value`, reusing the most recently freed slot
    /// if there is one.
    pub fn insert(&mut self, value: T) -> SlotIndex {
        match self.cache.pop() {
            Some(index) => {
                self.objects[index as usize] = value;
                index
            }
            None => {
                self.objects.push(value);
                (self.objects.len() - 1) as SlotIndex
            }
        }
    }

    /// Release `index` back to the free list.
    ///
    /// The pool does not check that `index` is currently allocated; releasing a
    /// slot twice corrupts the free list. Owners guard this with their own
    /// membership bookkeeping.
    pub fn destroy_object(&mut self, index: SlotIndex) {
        debug_assert!((index as usize) < self.objects.len());
        debug_assert!(!self.cache.contains(&index), "slot {index} freed twice");
        self.cache.push(index);
    }

    /// Returns the value stored at `index`.
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        self.objects.get(index as usize)
    }

    /// Returns a mutable reference to the value stored at `index`.
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.objects.get_mut(index as usize)
    }

    /// Total number of slots ever created (live plus free).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.objects.len()
    }

    /// Number of slots waiting on the free list.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.cache.len()
    }

    /// Number of slots currently allocated.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.objects.len() - self.cache.len()
    }
}

impl<T: Default> SlotPool<T> {
    /// Allocate a slot without writing to it.
    ///
    /// A reused slot still holds whatever was last written there; a fresh slot
    /// holds `T::default()`. Callers overwrite the value as needed.
    pub fn create_object(&mut self) -> SlotIndex {
        match self.cache.pop() {
            Some(index) => index,
            None => {
                self.objects.push(T::default());
                (self.objects.len() - 1) as SlotIndex
            }
        }
    }
}

impl<T> std::ops::Index<SlotIndex> for SlotPool<T> {
    type Output = T;

    fn index(&self, index: SlotIndex) -> &T {
        &self.objects[index as usize]
    }
}

impl<T> std::ops::IndexMut<SlotIndex> for SlotPool<T> {
    fn index_mut(&mut self, index: SlotIndex) -> &mut T {
        &mut self.objects[index as usize]
    }
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_appends() {
        let mut pool = SlotPool::new();
        assert_eq!(pool.insert("a"), 0);
        assert_eq!(pool.insert("b"), 1);
        assert_eq!(pool.get(1), Some(&"b"));
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_destroyed_slot_is_reused() {
        let mut pool = SlotPool::new();
        let first = pool.insert(10);
        pool.destroy_object(first);
        let second = pool.insert(20);
        assert_eq!(first, second);
        assert_eq!(pool.get(second), Some(&20));
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_reuse_is_lifo() {
        let mut pool = SlotPool::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        let c = pool.insert(3);
        pool.destroy_object(a);
        pool.destroy_object(c);
        assert_eq!(pool.next_index(), c);
        assert_eq!(pool.insert(4), c);
        assert_eq!(pool.insert(5), a);
        assert_eq!(pool.insert(6), 3);
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn test_create_object_keeps_stale_value() {
        let mut pool: SlotPool<u32> = SlotPool::new();
        let index = pool.create_object();
        assert_eq!(pool.get(index), Some(&0));
        *pool.get_mut(index).unwrap() = 99;
        pool.destroy_object(index);
        let again = pool.create_object();
        assert_eq!(again, index);
        assert_eq!(pool.get(again), Some(&99));
    }

    #[test]
    fn test_storage_never_shrinks() {
        let mut pool = SlotPool::new();
        let slots: Vec<_> = (0..4).map(|i| pool.insert(i)).collect();
        for slot in slots {
            pool.destroy_object(slot);
        }
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_count(), 4);
        assert_eq!(pool.live_count(), 0);
    }
}
