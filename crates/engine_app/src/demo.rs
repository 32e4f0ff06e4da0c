//! Component and resource types of the demo simulation.

use engine_component::{Component, Resource};
use glam::Vec3;

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Number of ticks before the entity is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    /// Ticks left, including the current one.
    pub remaining: u32,
}

impl Component for Lifetime {
    fn type_name() -> &'static str {
        "Lifetime"
    }
}

/// Simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimClock {
    /// Ticks completed.
    pub ticks: u64,
    /// Simulated seconds elapsed.
    pub elapsed: f64,
}

impl Resource for SimClock {
    fn type_name() -> &'static str {
        "SimClock"
    }
}

/// Counts down to the next spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimer {
    /// Ticks between spawns.
    pub every: u64,
    /// Ticks until the next spawn.
    pub countdown: u64,
    /// Entities spawned so far.
    pub spawned: u64,
}

impl SpawnTimer {
    /// A timer that fires on the first tick, then every `every` ticks.
    #[must_use]
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            countdown: 0,
            spawned: 0,
        }
    }

    /// Advance one tick. Returns `true` when a spawn is due.
    pub fn advance(&mut self) -> bool {
        if self.countdown == 0 {
            self.countdown = self.every - 1;
            true
        } else {
            self.countdown -= 1;
            false
        }
    }
}

impl Resource for SpawnTimer {
    fn type_name() -> &'static str {
        "SpawnTimer"
    }
}
