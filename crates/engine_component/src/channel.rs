//! Per-type component storage: one [`SlotPool`] coupled with one [`SparseSet`].
//!
//! An entity index is a member of a channel's sparse set exactly when the
//! entity's record holds a slot for that type, and that slot indexes a live
//! value in the pool. The channel keeps the two in step; the world keeps the
//! record in step with the channel.

use std::any::Any;

use tracing::trace;

use crate::component::Component;
use crate::error::EcsError;
use crate::pool::{SlotIndex, SlotPool};
use crate::sparse_set::SparseSet;

/// Storage and membership index for one component type.
#[derive(Debug, Clone)]
pub struct ComponentChannel<T> {
    pool: SlotPool<T>,
    members: SparseSet,
}

impl<T: Component> ComponentChannel<T> {
    /// Create an empty channel whose members lie in `0..=max_index`.
    #[must_use]
    pub fn new(max_index: u32) -> Self {
        Self {
            pool: SlotPool::new(),
            members: SparseSet::with_max_value(max_index),
        }
    }

    /// Store `value` for the entity at `index` and return its slot.
    ///
    /// Nothing is written if the entity cannot be added to the membership index.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfDomain`] or [`EcsError::DuplicateMember`]
    /// from the membership index.
    pub fn attach(&mut self, index: u32, value: T) -> Result<SlotIndex, EcsError> {
        self.members.insert(index)?;
        let slot = self.pool.insert(value);
        trace!(component = T::type_name(), index, slot, "attached component");
        Ok(slot)
    }

    /// Release `slot` and drop the entity at `index` from the membership index.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NotAMember`] if the entity is not in this channel;
    /// the pool is left untouched in that case.
    pub fn detach(&mut self, index: u32, slot: SlotIndex) -> Result<(), EcsError> {
        self.members.remove(index)?;
        self.pool.destroy_object(slot);
        trace!(component = T::type_name(), index, slot, "detached component");
        Ok(())
    }

    /// Returns `true` if the entity at `index` has this component.
    #[must_use]
    pub fn has(&self, index: u32) -> bool {
        self.members.contains(index)
    }

    /// Returns the value stored in `slot`.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&T> {
        self.pool.get(slot)
    }

    /// Returns a mutable reference to the value stored in `slot`.
    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut T> {
        self.pool.get_mut(slot)
    }

    /// Returns the membership index.
    #[must_use]
    pub fn members(&self) -> &SparseSet {
        &self.members
    }

    /// Returns the slot pool.
    #[must_use]
    pub fn pool(&self) -> &SlotPool<T> {
        &self.pool
    }

    /// Returns the number of entities holding this component.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no entity holds this component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Object-safe view of a [`ComponentChannel`], used where the world handles
/// every channel at once without knowing its component type.
pub trait ErasedChannel: Any {
    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Detach the entity at `index` whose value lives in `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NotAMember`] if the entity is not in this channel.
    fn detach_erased(&mut self, index: u32, slot: SlotIndex) -> Result<(), EcsError>;

    /// Returns `true` if the entity at `index` is a member.
    fn contains(&self, index: u32) -> bool;

    /// Returns the member indices in dense order.
    fn dense(&self) -> &[u32];

    /// Returns the number of members.
    fn member_count(&self) -> usize;

    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedChannel for ComponentChannel<T> {
    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn detach_erased(&mut self, index: u32, slot: SlotIndex) -> Result<(), EcsError> {
        self.detach(index, slot)
    }

    fn contains(&self, index: u32) -> bool {
        self.has(index)
    }

    fn dense(&self) -> &[u32] {
        self.members.dense()
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(f32);

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[test]
    fn test_attach_then_read() {
        let mut channel = ComponentChannel::new(16);
        let slot = channel.attach(3, Health(80.0)).unwrap();
        assert!(channel.has(3));
        assert_eq!(channel.get(slot), Some(&Health(80.0)));
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_attach_detach_roundtrip() {
        let mut channel = ComponentChannel::new(16);
        let slot = channel.attach(3, Health(1.0)).unwrap();
        channel.detach(3, slot).unwrap();
        assert!(!channel.has(3));
        assert!(channel.members().dense().is_empty());
        assert_eq!(channel.pool().free_count(), 1);
    }

    #[test]
    fn test_slot_reused_after_detach() {
        let mut channel = ComponentChannel::new(16);
        let first = channel.attach(1, Health(1.0)).unwrap();
        channel.detach(1, first).unwrap();
        let second = channel.attach(2, Health(2.0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(channel.get(second), Some(&Health(2.0)));
    }

    #[test]
    fn test_duplicate_attach_leaves_pool_untouched() {
        let mut channel = ComponentChannel::new(16);
        channel.attach(1, Health(1.0)).unwrap();
        assert_eq!(
            channel.attach(1, Health(2.0)),
            Err(EcsError::DuplicateMember(1))
        );
        assert_eq!(channel.pool().capacity(), 1);
    }

    #[test]
    fn test_detach_non_member_does_not_free_slot() {
        let mut channel: ComponentChannel<Health> = ComponentChannel::new(16);
        assert_eq!(channel.detach(5, 0), Err(EcsError::NotAMember(5)));
        assert_eq!(channel.pool().free_count(), 0);
    }

    #[test]
    fn test_attach_outside_domain_rejected() {
        let mut channel = ComponentChannel::new(2);
        assert_eq!(
            channel.attach(3, Health(1.0)),
            Err(EcsError::IndexOutOfDomain { value: 3, max: 2 })
        );
        assert_eq!(channel.pool().capacity(), 0);
    }

    #[test]
    fn test_erased_view() {
        let mut channel = ComponentChannel::new(16);
        let slot = channel.attach(4, Health(5.0)).unwrap();
        let erased: &mut dyn ErasedChannel = &mut channel;
        assert_eq!(erased.component_name(), "Health");
        assert!(erased.contains(4));
        assert_eq!(erased.dense(), &[4]);
        assert!(
            erased
                .as_any()
                .downcast_ref::<ComponentChannel<Health>>()
                .is_some()
        );
        erased.detach_erased(4, slot).unwrap();
        assert_eq!(erased.member_count(), 0);
    }
}
