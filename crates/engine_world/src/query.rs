//! The read-only query facade over a [`World`].
//!
//! A query names the component types an entity must hold. The channel with
//! the fewest members drives iteration; each candidate is then checked
//! against the remaining channels with an O(1) membership test, so the cost
//! is bounded by the rarest component in the signature.
//!
//! Results are snapshot copies. They stay valid across later mutations but
//! may then be stale with respect to the world.

use engine_component::{
    Component, ComponentId, EcsError, Entity, ErasedChannel, QueryDescriptor, Resource,
};
use tracing::trace;

use crate::bundle::ComponentSet;
use crate::world::World;

/// Answers membership queries and reads components and resources.
#[derive(Debug, Clone, Copy)]
pub struct Queryer<'w> {
    world: &'w World,
}

impl<'w> Queryer<'w> {
    /// Wrap a world for querying.
    #[must_use]
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Returns every live entity holding all component types in `S`.
    ///
    /// Order follows the driving channel's dense order and is not stable
    /// across mutations.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EmptyQuery`] for `()` and
    /// [`EcsError::UnregisteredComponent`] for an undeclared type.
    pub fn entities<S: ComponentSet>(&self) -> Result<Vec<Entity>, EcsError> {
        let ids = S::component_ids(self.world.registry())?;
        self.collect_matching(&ids)
    }

    /// Returns every live entity holding all component types in `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EmptyQuery`] for an empty descriptor and
    /// [`EcsError::UnknownComponentId`] for an ID outside the registry.
    pub fn entities_matching(
        &self,
        descriptor: &QueryDescriptor,
    ) -> Result<Vec<Entity>, EcsError> {
        self.collect_matching(descriptor.required_types())
    }

    /// Returns the number of live entities holding all component types in `S`.
    ///
    /// # Errors
    ///
    /// Same as [`Queryer::entities`].
    pub fn count<S: ComponentSet>(&self) -> Result<usize, EcsError> {
        Ok(self.entities::<S>()?.len())
    }

    fn collect_matching(&self, ids: &[ComponentId]) -> Result<Vec<Entity>, EcsError> {
        let channels = ids
            .iter()
            .map(|&id| {
                self.world
                    .erased_channel(id)
                    .ok_or(EcsError::UnknownComponentId(id))
            })
            .collect::<Result<Vec<&dyn ErasedChannel>, _>>()?;

        let Some((driver_pos, driver)) = channels
            .iter()
            .enumerate()
            .min_by_key(|(_, channel)| channel.member_count())
        else {
            return Err(EcsError::EmptyQuery);
        };

        trace!(
            driver = driver.component_name(),
            candidates = driver.member_count(),
            types = channels.len(),
            "running query"
        );

        let matches = driver
            .dense()
            .iter()
            .copied()
            .filter(|&index| {
                channels
                    .iter()
                    .enumerate()
                    .all(|(pos, channel)| pos == driver_pos || channel.contains(index))
            })
            .filter_map(|index| self.world.handle(index))
            .collect();
        Ok(matches)
    }

    /// Returns `true` if `entity` refers to a live entity.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.is_alive(entity)
    }

    /// Returns the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentMissing`] if the entity has no `T` and
    /// [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn component<T: Component>(&self, entity: Entity) -> Result<&'w T, EcsError> {
        self.world.component_ref::<T>(entity)
    }

    /// Returns resource `R`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ResourceMissing`] if `R` holds no value.
    pub fn resource<R: Resource>(&self) -> Result<&'w R, EcsError> {
        self.world
            .resource_slot::<R>()?
            .get()
            .ok_or(EcsError::ResourceMissing(R::type_name()))
    }

    /// Returns `true` if a live `entity` holds a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `T` was never declared.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        self.world.has_component::<T>(entity)
    }

    /// Returns `true` if resource `R` holds a value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredResource`] if `R` was never declared.
    pub fn has_resource<R: Resource>(&self) -> Result<bool, EcsError> {
        self.world.has_resource::<R>()
    }
}
