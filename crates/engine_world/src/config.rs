//! World configuration.

use engine_component::{DEFAULT_MAX_VALUE, EcsError};
use serde::{Deserialize, Serialize};

/// Largest accepted [`WorldConfig::max_entity_index`].
///
/// Each declared component allocates a sparse table of `max + 1` `u32`
/// entries up front, so this caps that table at 64 MiB.
pub const MAX_ENTITY_INDEX_LIMIT: u32 = (1 << 24) - 1;

/// Configuration fixed at world construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Largest entity index the world hands out. Every component sparse set
    /// is sized to this bound, costing `4 * (max + 1)` bytes per component.
    pub max_entity_index: u32,
    /// Number of entity records to reserve up front.
    pub initial_capacity: usize,
}

impl WorldConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the largest entity index.
    #[must_use]
    pub fn with_max_entity_index(mut self, max: u32) -> Self {
        self.max_entity_index = max;
        self
    }

    /// Check the config can be built into a world.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityDomainTooLarge`] if `max_entity_index` is
    /// above [`MAX_ENTITY_INDEX_LIMIT`].
    pub fn validate(&self) -> Result<(), EcsError> {
        if self.max_entity_index > MAX_ENTITY_INDEX_LIMIT {
            return Err(EcsError::EntityDomainTooLarge {
                max: self.max_entity_index,
                limit: MAX_ENTITY_INDEX_LIMIT,
            });
        }
        Ok(())
    }

    /// Override the number of entity records reserved up front.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_entity_index: DEFAULT_MAX_VALUE,
            initial_capacity: 0,
        }
    }
}
