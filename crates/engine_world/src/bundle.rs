//! Component tuples.
//!
//! [`ComponentSet`] names a list of component types (for queries and
//! removal); [`Bundle`] additionally carries one value per type (for entity
//! creation and insertion). Both are implemented for tuples of up to eight
//! components, including the empty tuple.

use engine_component::{Component, ComponentId, EcsError, Entity};

use crate::registry::TypeRegistry;
use crate::world::World;

/// A statically known list of distinct component types.
pub trait ComponentSet: 'static {
    /// Resolve every type in the set to its declared ID, in tuple order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] for an undeclared type and
    /// [`EcsError::DuplicateComponentInSet`] if a type appears twice.
    fn component_ids(registry: &TypeRegistry) -> Result<Vec<ComponentId>, EcsError>;
}

/// A tuple of component values attached together.
///
/// Bundles are consumed by [`Commands`](crate::Commands), which validates
/// the whole set before attaching anything. The trait is sealed, so values
/// cannot be attached to a world any other way:
///
/// ```compile_fail
/// use engine_component::Component;
/// use engine_world::World;
/// use engine_world::bundle::sealed::AttachBundle;
///
/// struct A(u32);
/// impl Component for A {
///     fn type_name() -> &'static str { "A" }
/// }
///
/// let mut world = World::builder().component::<A>().build().unwrap();
/// let e = world.commands().create_entity(()).unwrap();
/// (A(1), A(2)).attach_to(&mut world, e).unwrap();
/// ```
pub trait Bundle: ComponentSet + sealed::AttachBundle {}

pub(crate) mod sealed {
    use engine_component::{EcsError, Entity};

    use crate::world::World;

    pub trait AttachBundle {
        /// Attach every value to `entity`, in tuple order.
        ///
        /// Earlier values stay attached when a later one fails, so callers
        /// validate with [`ComponentSet::component_ids`](super::ComponentSet::component_ids)
        /// and the entity's record first.
        fn attach_to(self, world: &mut World, entity: Entity) -> Result<(), EcsError>;
    }
}

fn push_unique(
    ids: &mut Vec<ComponentId>,
    id: ComponentId,
    name: &'static str,
) -> Result<(), EcsError> {
    if ids.contains(&id) {
        return Err(EcsError::DuplicateComponentInSet(name));
    }
    ids.push(id);
    Ok(())
}

macro_rules! tuple_impl {
    ($($name: ident),*) => {
        impl<$($name: Component),*> ComponentSet for ($($name,)*) {
            #[allow(unused_variables, unused_mut)]
            fn component_ids(registry: &TypeRegistry) -> Result<Vec<ComponentId>, EcsError> {
                let mut ids = Vec::new();
                $(
                    push_unique(
                        &mut ids,
                        registry.component_id::<$name>()?,
                        <$name as Component>::type_name(),
                    )?;
                )*
                Ok(ids)
            }
        }

        impl<$($name: Component),*> Bundle for ($($name,)*) {}

        impl<$($name: Component),*> sealed::AttachBundle for ($($name,)*) {
            #[allow(unused_variables, non_snake_case)]
            fn attach_to(self, world: &mut World, entity: Entity) -> Result<(), EcsError> {
                let ($($name,)*) = self;
                $( world.attach(entity, $name)?; )*
                Ok(())
            }
        }
    };
}

tuple_impl!();
tuple_impl!(A);
tuple_impl!(A, B);
tuple_impl!(A, B, C);
tuple_impl!(A, B, C, D);
tuple_impl!(A, B, C, D, E);
tuple_impl!(A, B, C, D, E, F);
tuple_impl!(A, B, C, D, E, F, G);
tuple_impl!(A, B, C, D, E, F, G, H);
