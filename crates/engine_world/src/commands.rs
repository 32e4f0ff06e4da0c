//! The mutating facade over a [`World`].
//!
//! Every call is validated in full before any storage is touched, then
//! committed immediately. There is no rollback: a call either fails without
//! side effects or succeeds completely. Calls that return `&mut Self` can be
//! chained with `?`.

use engine_component::{Component, EcsError, Entity, Resource};
use tracing::debug;

use crate::bundle::sealed::AttachBundle;
use crate::bundle::{Bundle, ComponentSet};
use crate::world::World;

/// Creates and destroys entities, components and resources.
#[derive(Debug)]
pub struct Commands<'w> {
    world: &'w mut World,
}

impl<'w> Commands<'w> {
    /// Wrap a world for mutation.
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    /// Returns the underlying world for read access.
    #[must_use]
    pub fn world(&self) -> &World {
        self.world
    }

    /// Allocate an entity and attach every component in `bundle`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] or
    /// [`EcsError::DuplicateComponentInSet`] for an invalid bundle, and
    /// [`EcsError::EntityLimitReached`] when no index is left. No entity is
    /// allocated in either case.
    pub fn create_entity<B: Bundle>(&mut self, bundle: B) -> Result<Entity, EcsError> {
        B::component_ids(self.world.registry())?;
        let entity = self.world.allocate_entity()?;
        bundle.attach_to(self.world, entity)?;
        Ok(entity)
    }

    /// Attach every component in `bundle` to an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle and
    /// [`EcsError::ComponentAlreadyPresent`] if the entity already holds one of
    /// the types; detach it first to replace it.
    pub fn add_component<B: Bundle>(
        &mut self,
        entity: Entity,
        bundle: B,
    ) -> Result<&mut Self, EcsError> {
        let ids = B::component_ids(self.world.registry())?;
        let record = self.world.record(entity)?;
        if let Some(&id) = ids.iter().find(|&&id| record.slot(id).is_some()) {
            return Err(EcsError::ComponentAlreadyPresent {
                entity,
                component: self.world.component_name(id).unwrap_or("<unknown>"),
            });
        }
        bundle.attach_to(self.world, entity)?;
        Ok(self)
    }

    /// Detach every component type in `S` from `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentMissing`] if the entity lacks any of the
    /// types; nothing is detached in that case.
    pub fn remove_component<S: ComponentSet>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut Self, EcsError> {
        let ids = S::component_ids(self.world.registry())?;
        let record = self.world.record(entity)?;
        if let Some(&id) = ids.iter().find(|&&id| record.slot(id).is_none()) {
            return Err(EcsError::ComponentMissing {
                entity,
                component: self.world.component_name(id).unwrap_or("<unknown>"),
            });
        }
        for id in ids {
            self.world.detach(entity, id)?;
        }
        Ok(self)
    }

    /// Detach every component the entity holds and free its index.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<&mut Self, EcsError> {
        self.world.destroy_entity(entity)?;
        Ok(self)
    }

    /// Store `value` as the resource of its type, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredResource`] if `R` was never declared.
    pub fn create_resource<R: Resource>(&mut self, value: R) -> Result<&mut Self, EcsError> {
        let replaced = self.world.resource_slot_mut::<R>()?.set(value).is_some();
        debug!(resource = R::type_name(), replaced, "created resource");
        Ok(self)
    }

    /// Drop the value of resource `R`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredResource`] if `R` was never declared and
    /// [`EcsError::ResourceMissing`] if it holds no value.
    pub fn destroy_resource<R: Resource>(&mut self) -> Result<&mut Self, EcsError> {
        self.world
            .resource_slot_mut::<R>()?
            .take()
            .ok_or(EcsError::ResourceMissing(R::type_name()))?;
        debug!(resource = R::type_name(), "destroyed resource");
        Ok(self)
    }

    /// Returns the entity's `T` for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentMissing`] if the entity has no `T`.
    pub fn get_component<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.world.component_mut::<T>(entity)
    }

    /// Returns resource `R` for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ResourceMissing`] if `R` holds no value.
    pub fn get_resource<R: Resource>(&mut self) -> Result<&mut R, EcsError> {
        self.world
            .resource_slot_mut::<R>()?
            .get_mut()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct A(u32);
    impl Component for A {
        fn type_name() -> &'static str {
            "A"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct B(u32);
    impl Component for B {
        fn type_name() -> &'static str {
            "B"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Unlisted;
    impl Component for Unlisted {
        fn type_name() -> &'static str {
            "Unlisted"
        }
    }

    #[derive(Debug, PartialEq)]
    struct Timer(u32);
    impl Resource for Timer {
        fn type_name() -> &'static str {
            "Timer"
        }
    }

    fn make_world() -> World {
        World::builder()
            .component::<A>()
            .component::<B>()
            .resource::<Timer>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_entity_with_components() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1), B(2))).unwrap();
        assert_eq!(commands.get_component::<A>(e), Ok(&mut A(1)));
        assert_eq!(commands.get_component::<B>(e), Ok(&mut B(2)));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_create_empty_entity() {
        let mut world = make_world();
        let e = world.commands().create_entity(()).unwrap();
        assert!(world.is_alive(e));
        assert_eq!(world.has_component::<A>(e), Ok(false));
    }

    #[test]
    fn test_invalid_bundle_allocates_nothing() {
        let mut world = make_world();
        let mut commands = world.commands();
        assert_eq!(
            commands.create_entity((A(1), Unlisted)),
            Err(EcsError::UnregisteredComponent("Unlisted"))
        );
        assert_eq!(
            commands.create_entity((A(1), A(2))),
            Err(EcsError::DuplicateComponentInSet("A"))
        );
        assert_eq!(world.entity_count(), 0);
        assert!(world.channel::<A>().unwrap().is_empty());
    }

    #[test]
    fn test_get_component_is_mutable() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1),)).unwrap();
        commands.get_component::<A>(e).unwrap().0 = 42;
        assert_eq!(world.query().component::<A>(e), Ok(&A(42)));
    }

    #[test]
    fn test_add_component_chains() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity(()).unwrap();
        commands
            .add_component(e, (A(1),))
            .unwrap()
            .add_component(e, (B(2),))
            .unwrap();
        assert_eq!(commands.has_component::<A>(e), Ok(true));
        assert_eq!(commands.has_component::<B>(e), Ok(true));
    }

    #[test]
    fn test_add_existing_component_rejected_without_side_effects() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1),)).unwrap();
        assert_eq!(
            commands.add_component(e, (B(2), A(3))).err(),
            Some(EcsError::ComponentAlreadyPresent {
                entity: e,
                component: "A"
            })
        );
        assert_eq!(commands.has_component::<B>(e), Ok(false));
        assert_eq!(commands.get_component::<A>(e), Ok(&mut A(1)));
    }

    #[test]
    fn test_add_duplicate_bundle_attaches_nothing() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((B(0),)).unwrap();
        assert_eq!(
            commands.add_component(e, (A(1), A(2))).err(),
            Some(EcsError::DuplicateComponentInSet("A"))
        );
        assert_eq!(commands.has_component::<A>(e), Ok(false));
        assert!(world.channel::<A>().unwrap().is_empty());
        assert_eq!(world.channel::<A>().unwrap().pool().capacity(), 0);
    }

    #[test]
    fn test_replace_component_by_detaching_first() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1),)).unwrap();
        commands
            .remove_component::<(A,)>(e)
            .unwrap()
            .add_component(e, (A(2),))
            .unwrap();
        assert_eq!(commands.get_component::<A>(e), Ok(&mut A(2)));
        assert_eq!(world.channel::<A>().unwrap().pool().capacity(), 1);
    }

    #[test]
    fn test_remove_component_roundtrip() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1), B(1))).unwrap();
        commands.remove_component::<(A, B)>(e).unwrap();
        assert_eq!(commands.has_component::<A>(e), Ok(false));
        assert_eq!(commands.has_component::<B>(e), Ok(false));
        assert!(world.channel::<A>().unwrap().members().is_empty());
        assert!(world.is_alive(e));
    }

    #[test]
    fn test_remove_missing_component_rejected_without_side_effects() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1),)).unwrap();
        assert_eq!(
            commands.remove_component::<(A, B)>(e).err(),
            Some(EcsError::ComponentMissing {
                entity: e,
                component: "B"
            })
        );
        assert_eq!(commands.has_component::<A>(e), Ok(true));
    }

    #[test]
    fn test_get_missing_component_fails() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1),)).unwrap();
        assert_eq!(
            commands.get_component::<B>(e),
            Err(EcsError::ComponentMissing {
                entity: e,
                component: "B"
            })
        );
    }

    #[test]
    fn test_remove_entity_invalidates_handle() {
        let mut world = make_world();
        let mut commands = world.commands();
        let e = commands.create_entity((A(1), B(2))).unwrap();
        commands.remove_entity(e).unwrap();
        assert_eq!(
            commands.get_component::<A>(e),
            Err(EcsError::EntityNotAlive(e))
        );
        assert_eq!(
            commands.remove_entity(e).err(),
            Some(EcsError::EntityNotAlive(e))
        );
        assert_eq!(
            commands.add_component(e, (A(1),)).err(),
            Some(EcsError::EntityNotAlive(e))
        );
    }

    #[test]
    fn test_reused_index_does_not_alias_old_handle() {
        let mut world = make_world();
        let mut commands = world.commands();
        let old = commands.create_entity((A(1),)).unwrap();
        commands.remove_entity(old).unwrap();
        let new = commands.create_entity((A(2),)).unwrap();
        assert_eq!(old.index(), new.index());
        assert!(commands.get_component::<A>(old).is_err());
        assert_eq!(commands.get_component::<A>(new), Ok(&mut A(2)));
    }

    #[test]
    fn test_resource_lifecycle() {
        let mut world = make_world();
        let mut commands = world.commands();
        commands.create_resource(Timer(321)).unwrap();
        assert_eq!(commands.get_resource::<Timer>(), Ok(&mut Timer(321)));
        commands.destroy_resource::<Timer>().unwrap();
        assert_eq!(
            commands.get_resource::<Timer>(),
            Err(EcsError::ResourceMissing("Timer"))
        );
        assert_eq!(
            commands.destroy_resource::<Timer>().err(),
            Some(EcsError::ResourceMissing("Timer"))
        );
    }

    #[test]
    fn test_create_resource_overwrites() {
        let mut world = make_world();
        let mut commands = world.commands();
        commands
            .create_resource(Timer(1))
            .unwrap()
            .create_resource(Timer(2))
            .unwrap();
        assert_eq!(commands.get_resource::<Timer>(), Ok(&mut Timer(2)));
        assert_eq!(commands.has_resource::<Timer>(), Ok(true));
    }

    #[test]
    fn test_undeclared_resource_fails() {
        #[derive(Debug)]
        struct Score;
        impl Resource for Score {
            fn type_name() -> &'static str {
                "Score"
            }
        }

        let mut world = make_world();
        let mut commands = world.commands();
        assert_eq!(
            commands.create_resource(Score).err(),
            Some(EcsError::UnregisteredResource("Score"))
        );
        assert_eq!(
            commands.destroy_resource::<Score>().err(),
            Some(EcsError::UnregisteredResource("Score"))
        );
    }
}
