//! Sparse-set membership index over a bounded `u32` domain.
//!
//! A [`SparseSet`] pairs a dense vector of members with a sparse side table
//! mapping each value to its position in the dense vector. Insert, remove,
//! and membership test are all O(1); iteration walks only the dense vector.
//!
//! Invariant: `dense[sparse[v]] == v` for every member `v`.

use crate::error::EcsError;

/// Sparse table entry for a value that is not a member.
const ABSENT: u32 = u32::MAX;

/// Default upper bound of the value domain.
pub const DEFAULT_MAX_VALUE: u32 = 10_000;

/// An O(1) membership index over the values `0..=max_value`.
#[derive(Debug, Clone)]
pub struct SparseSet {
    /// Members in arbitrary, swap-affected order.
    dense: Vec<u32>,
    /// `sparse[v]` is the position of `v` in `dense`, or [`ABSENT`].
    sparse: Vec<u32>,
    /// Largest value this set accepts.
    max_value: u32,
}

impl SparseSet {
    /// Create an empty set accepting values up to and including `max_value`.
    ///
    /// The sparse table is allocated up front, one entry per domain value.
    #[must_use]
    pub fn with_max_value(max_value: u32) -> Self {
        Self {
            dense: Vec::new(),
            sparse: vec![ABSENT; max_value as usize + 1],
            max_value,
        }
    }

    /// Returns the largest value this set accepts.
    #[must_use]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns `true` if `value` is a member.
    ///
    /// Values outside the domain are simply not members.
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        match self.sparse.get(value as usize) {
            Some(&pos) => self.dense.get(pos as usize) == Some(&value),
            None => false,
        }
    }

    /// Add `value` to the set.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfDomain`] if `value > max_value` and
    /// [`EcsError::DuplicateMember`] if it is already present.
    pub fn insert(&mut self, value: u32) -> Result<(), EcsError> {
        if value > self.max_value {
            return Err(EcsError::IndexOutOfDomain {
                value,
                max: self.max_value,
            });
        }
        if self.contains(value) {
            return Err(EcsError::DuplicateMember(value));
        }
        self.sparse[value as usize] = self.dense.len() as u32;
        self.dense.push(value);
        Ok(())
    }

    /// Remove `value` by swapping it with the last member and popping.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NotAMember`] if `value` is not in the set.
    pub fn remove(&mut self, value: u32) -> Result<(), EcsError> {
        if !self.contains(value) {
            return Err(EcsError::NotAMember(value));
        }
        let pos = self.sparse[value as usize];
        let last = self.dense[self.dense.len() - 1];
        self.dense.swap_remove(pos as usize);
        if last != value {
            self.sparse[last as usize] = pos;
        }
        self.sparse[value as usize] = ABSENT;
        Ok(())
    }

    /// Returns the live members. Order changes after any [`SparseSet::remove`].
    #[must_use]
    pub fn dense(&self) -> &[u32] {
        &self.dense
    }

    /// Iterate over the members in dense order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.dense.iter().copied()
    }

    /// Remove every member, keeping the domain.
    pub fn clear(&mut self) {
        for &value in &self.dense {
            self.sparse[value as usize] = ABSENT;
        }
        self.dense.clear();
    }
}

impl Default for SparseSet {
    fn default() -> Self {
        Self::with_max_value(DEFAULT_MAX_VALUE)
    }
}
