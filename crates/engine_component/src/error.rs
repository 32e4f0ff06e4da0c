//! Storage-layer error types.
//!
//! Every variant is a contract violation on the caller's side. Absence that a
//! caller is expected to branch on is exposed through `has_*` queries instead.

use crate::component::ComponentId;
use crate::entity::Entity;

/// Errors that can occur while operating on entities, components, resources
/// and queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// A value lies outside the domain a sparse set was configured for.
    #[error("index {value} is outside the sparse set domain (max {max})")]
    IndexOutOfDomain {
        /// The rejected value.
        value: u32,
        /// The configured maximum value.
        max: u32,
    },

    /// The value is already a member of the sparse set.
    #[error("index {0} is already a member")]
    DuplicateMember(u32),

    /// The value is not a member of the sparse set.
    #[error("index {0} is not a member")]
    NotAMember(u32),

    /// The handle refers to a destroyed entity, or a slot that was reused.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The entity table has no free index left within the configured bound.
    #[error("entity limit reached (max index {max})")]
    EntityLimitReached {
        /// The configured maximum entity index.
        max: u32,
    },

    /// The configured entity domain exceeds what sparse sets may allocate.
    #[error("max entity index {max} exceeds the supported limit {limit}")]
    EntityDomainTooLarge {
        /// The configured maximum entity index.
        max: u32,
        /// The largest accepted maximum entity index.
        limit: u32,
    },

    /// The entity already holds a component of this type.
    #[error("{entity} already has component '{component}'")]
    ComponentAlreadyPresent {
        /// The entity.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// The entity does not hold a component of this type.
    #[error("{entity} has no component '{component}'")]
    ComponentMissing {
        /// The entity.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// The same component type appears twice in one set.
    #[error("component '{0}' appears more than once in a component set")]
    DuplicateComponentInSet(&'static str),

    /// The component type was never declared to the world.
    #[error("component '{0}' is not registered")]
    UnregisteredComponent(&'static str),

    /// A declared query names an ID no component type was assigned.
    #[error("{0:?} is not registered")]
    UnknownComponentId(ComponentId),

    /// The resource type was never declared to the world.
    #[error("resource '{0}' is not registered")]
    UnregisteredResource(&'static str),

    /// A component or resource type was declared twice.
    #[error("type '{0}' is registered more than once")]
    DuplicateRegistration(&'static str),

    /// The resource is declared but currently holds no value.
    #[error("resource '{0}' has no value")]
    ResourceMissing(&'static str),

    /// A query was issued with no component types.
    #[error("query has no component types")]
    EmptyQuery,
}
