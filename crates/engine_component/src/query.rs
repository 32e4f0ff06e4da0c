//! Declared query signatures.
//!
//! A [`QueryDescriptor`] names the component types an entity must hold to
//! match. It is the runtime counterpart of a typed component tuple, for
//! callers that only learn the signature after the world is built.

use serde::{Deserialize, Serialize};

use crate::component::ComponentId;

/// The set of component types a query requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Component types every matching entity must hold.
    pub required: Vec<ComponentId>,
}

impl QueryDescriptor {
    /// Create a new empty query descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required component type. Repeats are ignored.
    #[must_use]
    pub fn with(mut self, id: ComponentId) -> Self {
        if !self.required.contains(&id) {
            self.required.push(id);
        }
        self
    }

    /// Returns the required component types in declaration order.
    #[must_use]
    pub fn required_types(&self) -> &[ComponentId] {
        &self.required
    }

    /// Returns `true` if the descriptor names no component type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

impl FromIterator<ComponentId> for QueryDescriptor {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}
