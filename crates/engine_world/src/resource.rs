//! Singleton resource storage.

/// Holds at most one value of a declared resource type.
#[derive(Debug, Clone)]
pub struct ResourceSlot<T> {
    value: Option<T>,
}

impl<T> ResourceSlot<T> {
    /// Create an empty slot.
    #[must_use]
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Store `value`, returning the previous one.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    /// Remove and return the stored value.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Returns the stored value.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the stored value mutably.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Returns `true` if a value is stored.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}
