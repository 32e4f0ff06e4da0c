//! Type registry: the declared component and resource types of a world.
//!
//! Declaration order assigns dense IDs: the first component declared gets
//! `ComponentId(0)`, the next `ComponentId(1)`, and so on. The registry is
//! frozen once the world is built, so IDs are stable for the world's lifetime.

use std::any::TypeId;
use std::collections::HashMap;

use engine_component::{
    Component, ComponentId, ComponentMeta, EcsError, Resource, ResourceId, ResourceMeta,
};

/// Maps Rust types to the dense IDs they were declared under.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    components: Vec<ComponentMeta>,
    component_ids: HashMap<TypeId, ComponentId>,
    resources: Vec<ResourceMeta>,
    resource_ids: HashMap<TypeId, ResourceId>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare component type `T` and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateRegistration`] if `T` is already declared.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentId, EcsError> {
        let type_id = TypeId::of::<T>();
        if self.component_ids.contains_key(&type_id) {
            return Err(EcsError::DuplicateRegistration(T::type_name()));
        }
        let id = ComponentId(self.components.len() as u32);
        self.components.push(ComponentMeta {
            id,
            name: T::type_name(),
        });
        self.component_ids.insert(type_id, id);
        Ok(id)
    }

    /// Declare resource type `R` and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateRegistration`] if `R` is already declared.
    pub fn register_resource<R: Resource>(&mut self) -> Result<ResourceId, EcsError> {
        let type_id = TypeId::of::<R>();
        if self.resource_ids.contains_key(&type_id) {
            return Err(EcsError::DuplicateRegistration(R::type_name()));
        }
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(ResourceMeta {
            id,
            name: R::type_name(),
        });
        self.resource_ids.insert(type_id, id);
        Ok(id)
    }

    /// Returns the ID of component type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `T` was never declared.
    pub fn component_id<T: Component>(&self) -> Result<ComponentId, EcsError> {
        self.component_ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent(T::type_name()))
    }

    /// Returns the ID of resource type `R`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredResource`] if `R` was never declared.
    pub fn resource_id<R: Resource>(&self) -> Result<ResourceId, EcsError> {
        self.resource_ids
            .get(&TypeId::of::<R>())
            .copied()
            .ok_or(EcsError::UnregisteredResource(R::type_name()))
    }

    /// Returns metadata about a declared component.
    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&ComponentMeta> {
        self.components.get(id.index())
    }

    /// Returns metadata about a declared resource.
    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceMeta> {
        self.resources.get(id.index())
    }

    /// Iterate over declared components in ID order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.components.iter()
    }

    /// Iterate over declared resources in ID order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceMeta> {
        self.resources.iter()
    }

    /// Returns the number of declared component types.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns the number of declared resource types.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    struct Velocity;
    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    struct Timer;
    impl Resource for Timer {
        fn type_name() -> &'static str {
            "Timer"
        }
    }

    #[test]
    fn test_ids_follow_declaration_order() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.register_component::<Velocity>(), Ok(ComponentId(0)));
        assert_eq!(registry.register_component::<Position>(), Ok(ComponentId(1)));
        assert_eq!(registry.component_id::<Position>(), Ok(ComponentId(1)));
        assert_eq!(registry.component_count(), 2);
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register_component::<Position>().unwrap();
        assert_eq!(
            registry.register_component::<Position>(),
            Err(EcsError::DuplicateRegistration("Position"))
        );
        assert_eq!(registry.component_count(), 1);
    }

    #[test]
    fn test_unregistered_lookups_fail() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.component_id::<Position>(),
            Err(EcsError::UnregisteredComponent("Position"))
        );
        assert_eq!(
            registry.resource_id::<Timer>(),
            Err(EcsError::UnregisteredResource("Timer"))
        );
    }

    #[test]
    fn test_resource_metadata() {
        let mut registry = TypeRegistry::new();
        let id = registry.register_resource::<Timer>().unwrap();
        assert_eq!(registry.resource(id).map(|m| m.name), Some("Timer"));
        assert_eq!(registry.resource_count(), 1);
        assert_eq!(registry.component_count(), 0);
    }

    #[test]
    fn test_component_metadata_iteration() {
        let mut registry = TypeRegistry::new();
        registry.register_component::<Position>().unwrap();
        registry.register_component::<Velocity>().unwrap();
        let names: Vec<_> = registry.components().map(|m| m.name).collect();
        assert_eq!(names, vec!["Position", "Velocity"]);
    }
}
