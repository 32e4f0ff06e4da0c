//! Core [`Component`] and [`Resource`] traits and their type identifiers.
//!
//! ## Type Identity
//!
//! [`ComponentId`] and [`ResourceId`] are dense indices assigned in
//! declaration order when a world is built. There is no process-wide counter:
//! the same declaration list always yields the same IDs, independent of which
//! type is touched first at runtime.

use serde::{Deserialize, Serialize};

/// Dense identifier of a declared component type.
///
/// Doubles as the index into every entity's slot record and into the world's
/// channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// Returns the ID as a `usize` index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dense identifier of a declared resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Returns the ID as a `usize` index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Metadata about a declared component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMeta {
    /// The dense type identifier.
    pub id: ComponentId,
    /// The human-readable name of the component (e.g. `"Position"`).
    pub name: &'static str,
}

/// Metadata about a declared resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    /// The dense type identifier.
    pub id: ResourceId,
    /// The human-readable name of the resource (e.g. `"Timer"`).
    pub name: &'static str,
}

/// The core component trait.
///
/// A component is a typed value attached to at most one entity at a time,
/// one per type per entity.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;
}

/// A typed singleton stored in the world, independent of any entity.
pub trait Resource: 'static {
    /// A human-readable name for this resource type.
    fn type_name() -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    struct Timer;

    impl Resource for Timer {
        fn type_name() -> &'static str {
            "Timer"
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Health::type_name(), "Health");
        assert_eq!(<Timer as Resource>::type_name(), "Timer");
    }

    #[test]
    fn test_id_index() {
        assert_eq!(ComponentId(3).index(), 3);
        assert_eq!(ResourceId(0).index(), 0);
        assert!(ComponentId(1) < ComponentId(2));
    }
}
