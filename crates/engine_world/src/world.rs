//! World state storage.
//!
//! The [`World`] owns one [`ComponentChannel`] per declared component type,
//! one [`ResourceSlot`] per declared resource type, and the [`EntityTable`].
//! It is the single source of truth; [`Commands`] is its only writer and
//! [`Queryer`] reads from it.
//!
//! Channels are stored behind [`ErasedChannel`] in [`ComponentId`] order and
//! resources as `Box<dyn Any>` in resource ID order. Each box is created by a
//! factory monomorphised for the declared type and placed at that type's
//! registry index, so the typed downcast in [`World::channel`] and the
//! resource accessors succeeds for every declared type. The only failing
//! lookup is an undeclared type, reported as
//! [`EcsError::UnregisteredComponent`] or [`EcsError::UnregisteredResource`].
//! The declared type list is a runtime value, so a world type per declaration
//! list is not generated.

use std::any::Any;

use engine_component::{
    Component, ComponentChannel, ComponentId, EcsError, Entity, EntityRecord, EntityTable,
    ErasedChannel, Resource, SlotIndex,
};
use tracing::{debug, warn};

use crate::commands::Commands;
use crate::config::WorldConfig;
use crate::query::Queryer;
use crate::registry::TypeRegistry;
use crate::resource::ResourceSlot;

type ChannelFactory = fn(u32) -> Box<dyn ErasedChannel>;
type ResourceFactory = fn() -> Box<dyn Any>;

fn make_channel<T: Component>(max_index: u32) -> Box<dyn ErasedChannel> {
    Box::new(ComponentChannel::<T>::new(max_index))
}

fn make_resource_slot<R: Resource>() -> Box<dyn Any> {
    Box::new(ResourceSlot::<R>::empty())
}

/// Declares the component and resource types of a [`World`] before it exists.
///
/// ```rust
/// use engine_component::{Component, Resource};
/// use engine_world::World;
///
/// struct Position(f32, f32);
/// impl Component for Position {
///     fn type_name() -> &'static str { "Position" }
/// }
///
/// struct Timer(u32);
/// impl Resource for Timer {
///     fn type_name() -> &'static str { "Timer" }
/// }
///
/// let world = World::builder()
///     .component::<Position>()
///     .resource::<Timer>()
///     .build()
///     .unwrap();
/// assert_eq!(world.component_count(), 1);
/// ```
pub struct WorldBuilder {
    config: WorldConfig,
    registry: TypeRegistry,
    channels: Vec<ChannelFactory>,
    resources: Vec<ResourceFactory>,
    error: Option<EcsError>,
}

impl WorldBuilder {
    /// Start a declaration with the given configuration.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
            channels: Vec::new(),
            resources: Vec::new(),
            error: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare component type `T`.
    #[must_use]
    pub fn component<T: Component>(mut self) -> Self {
        match self.registry.register_component::<T>() {
            Ok(_) => self.channels.push(make_channel::<T>),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Declare resource type `R`. The slot starts out empty.
    #[must_use]
    pub fn resource<R: Resource>(mut self) -> Self {
        match self.registry.register_resource::<R>() {
            Ok(_) => self.resources.push(make_resource_slot::<R>),
            Err(e) => self.record_error(e),
        }
        self
    }

    fn record_error(&mut self, error: EcsError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Freeze the declarations and create the world.
    ///
    /// # Errors
    ///
    /// Returns the first declaration error, e.g.
    /// [`EcsError::DuplicateRegistration`], or
    /// [`EcsError::EntityDomainTooLarge`] for an oversized config.
    pub fn build(self) -> Result<World, EcsError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.validate()?;
        let max = self.config.max_entity_index;
        let channels = self.channels.iter().map(|make| make(max)).collect();
        let resources = self.resources.iter().map(|make| make()).collect();
        let entities = EntityTable::with_capacity(
            self.registry.component_count(),
            max,
            self.config.initial_capacity,
        );

        debug!(
            components = self.registry.component_count(),
            resources = self.registry.resource_count(),
            max_entity_index = max,
            "world built"
        );

        Ok(World {
            config: self.config,
            registry: self.registry,
            channels,
            resources,
            entities,
        })
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// The canonical world state.
pub struct World {
    config: WorldConfig,
    registry: TypeRegistry,
    /// Indexed by [`ComponentId`].
    channels: Vec<Box<dyn ErasedChannel>>,
    /// Indexed by resource ID; each holds a `ResourceSlot<R>`.
    resources: Vec<Box<dyn Any>>,
    entities: EntityTable,
}

impl World {
    /// Start declaring a world with the default configuration.
    #[must_use]
    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    /// Returns the mutating facade over this world.
    pub fn commands(&mut self) -> Commands<'_> {
        Commands::new(self)
    }

    /// Returns the read-only query facade over this world.
    #[must_use]
    pub fn query(&self) -> Queryer<'_> {
        Queryer::new(self)
    }

    /// Returns the configuration the world was built with.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of declared component types.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of declared resource types.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if `entity` refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Iterate over every live entity in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Returns the name of a declared component.
    #[must_use]
    pub fn component_name(&self, id: ComponentId) -> Option<&'static str> {
        self.registry.component(id).map(|meta| meta.name)
    }

    /// Returns the ID of component type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `T` was never declared.
    pub fn component_id<T: Component>(&self) -> Result<ComponentId, EcsError> {
        self.registry.component_id::<T>()
    }

    /// Returns the typed channel of component `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `T` was never declared.
    pub fn channel<T: Component>(&self) -> Result<&ComponentChannel<T>, EcsError> {
        let id = self.component_id::<T>()?;
        self.channels
            .get(id.index())
            .and_then(|channel| channel.as_any().downcast_ref())
            .ok_or(EcsError::UnregisteredComponent(T::type_name()))
    }

    fn channel_mut<T: Component>(&mut self) -> Result<&mut ComponentChannel<T>, EcsError> {
        let id = self.component_id::<T>()?;
        self.channels
            .get_mut(id.index())
            .and_then(|channel| channel.as_any_mut().downcast_mut())
            .ok_or(EcsError::UnregisteredComponent(T::type_name()))
    }

    /// Returns the untyped channel of a declared component.
    #[must_use]
    pub fn erased_channel(&self, id: ComponentId) -> Option<&dyn ErasedChannel> {
        self.channels.get(id.index()).map(|channel| &**channel)
    }

    #[must_use]
    pub(crate) fn handle(&self, index: u32) -> Option<Entity> {
        self.entities.handle(index)
    }

    pub(crate) fn record(&self, entity: Entity) -> Result<&EntityRecord, EcsError> {
        self.entities.record(entity)
    }

    pub(crate) fn allocate_entity(&mut self) -> Result<Entity, EcsError> {
        let entity = self.entities.allocate()?;
        debug!(%entity, live = self.entities.len(), "allocated entity");
        Ok(entity)
    }

    /// Attach `value` to a live entity that does not yet hold a `T`.
    pub(crate) fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        let id = self.component_id::<T>()?;
        if self.record(entity)?.slot(id).is_some() {
            return Err(EcsError::ComponentAlreadyPresent {
                entity,
                component: T::type_name(),
            });
        }
        let slot = self.channel_mut::<T>()?.attach(entity.index(), value)?;
        self.entities.record_mut(entity)?.set_slot(id, Some(slot));
        Ok(())
    }

    /// Detach component `id` from a live entity that holds it.
    pub(crate) fn detach(&mut self, entity: Entity, id: ComponentId) -> Result<(), EcsError> {
        let slot = self.slot_of(entity, id)?;
        self.detach_slot(entity, id, slot)
    }

    fn detach_slot(
        &mut self,
        entity: Entity,
        id: ComponentId,
        slot: SlotIndex,
    ) -> Result<(), EcsError> {
        let channel = self
            .channels
            .get_mut(id.index())
            .ok_or(EcsError::UnknownComponentId(id))?;
        channel.detach_erased(entity.index(), slot)?;
        self.entities.record_mut(entity)?.set_slot(id, None);
        Ok(())
    }

    fn slot_of(&self, entity: Entity, id: ComponentId) -> Result<SlotIndex, EcsError> {
        let record = self.record(entity)?;
        record.slot(id).ok_or_else(|| EcsError::ComponentMissing {
            entity,
            component: self.component_name(id).unwrap_or("<unknown>"),
        })
    }

    /// Detach every component the entity holds, then free its index.
    pub(crate) fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let occupied: Vec<(ComponentId, SlotIndex)> = self.record(entity)?.occupied().collect();
        for (id, slot) in occupied {
            self.detach_slot(entity, id, slot)?;
        }
        self.entities.free(entity)?;
        debug!(%entity, live = self.entities.len(), "freed entity");
        Ok(())
    }

    pub(crate) fn component_ref<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        let slot = self.slot_of(entity, self.component_id::<T>()?)?;
        self.channel::<T>()?
            .get(slot)
            .ok_or(EcsError::ComponentMissing {
                entity,
                component: T::type_name(),
            })
    }

    pub(crate) fn component_mut<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, EcsError> {
        let slot = self.slot_of(entity, self.component_id::<T>()?)?;
        self.channel_mut::<T>()?
            .get_mut(slot)
            .ok_or(EcsError::ComponentMissing {
                entity,
                component: T::type_name(),
            })
    }

    /// Returns `true` if a live `entity` holds a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `T` was never declared.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        let channel = self.channel::<T>()?;
        Ok(self.entities.is_alive(entity) && channel.has(entity.index()))
    }

    pub(crate) fn resource_slot<R: Resource>(&self) -> Result<&ResourceSlot<R>, EcsError> {
        let id = self.registry.resource_id::<R>()?;
        self.resources
            .get(id.index())
            .and_then(|slot| slot.downcast_ref())
            .ok_or(EcsError::UnregisteredResource(R::type_name()))
    }

    pub(crate) fn resource_slot_mut<R: Resource>(
        &mut self,
    ) -> Result<&mut ResourceSlot<R>, EcsError> {
        let id = self.registry.resource_id::<R>()?;
        self.resources
            .get_mut(id.index())
            .and_then(|slot| slot.downcast_mut())
            .ok_or(EcsError::UnregisteredResource(R::type_name()))
    }

    /// Returns `true` if resource `R` currently holds a value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredResource`] if `R` was never declared.
    pub fn has_resource<R: Resource>(&self) -> Result<bool, EcsError> {
        Ok(self.resource_slot::<R>()?.is_set())
    }

    /// Destroy every entity, keeping declarations and resources.
    pub fn clear(&mut self) {
        let live: Vec<Entity> = self.entities.iter().collect();
        let count = live.len();
        for entity in live {
            // Handles come straight from the table, so they are live.
            if let Err(e) = self.destroy_entity(entity) {
                warn!(%entity, error = %e, "failed to destroy entity during clear");
            }
        }
        debug!(count, "cleared world");
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("entities", &self.entities.len())
            .field("components", &self.registry.component_count())
            .field("resources", &self.registry.resource_count())
            .finish()
    }
}
