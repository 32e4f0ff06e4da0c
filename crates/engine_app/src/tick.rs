//! Fixed-timestep tick loop of the demo simulation.
//!
//! Each tick runs, in order:
//!
//! 1. Spawn: create a moving entity when the spawn timer fires; every third
//!    spawn is static (no [`Velocity`]).
//! 2. Movement: integrate `Position += Velocity * dt` for every entity holding both.
//! 3. Expiry: count down every [`Lifetime`] and remove entities that reach zero.
//! 4. Clock: advance the [`SimClock`] resource.
//!
//! Queries are snapshots taken before each phase mutates the world.

use std::time::{Duration, Instant};

use engine_component::{EcsError, Entity};
use engine_world::{World, WorldConfig};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::demo::{Lifetime, Position, SimClock, SpawnTimer, Velocity};

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Ticks between spawns.
    pub spawn_every: u64,
    /// Lifetime of each spawned entity, in ticks.
    pub lifetime_ticks: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            spawn_every: 1,
            lifetime_ticks: 120,
        }
    }
}

/// What one tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    /// Entities created this tick.
    pub spawned: usize,
    /// Entities moved this tick.
    pub moved: usize,
    /// Entities removed this tick.
    pub expired: usize,
    /// Live entities after the tick.
    pub live: usize,
}

/// The tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    /// Tick configuration.
    config: TickConfig,
    /// The simulated world.
    world: World,
}

impl TickLoop {
    /// Declare the demo types, seed the resources, and create the loop.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError`] if the world cannot be built.
    pub fn new(config: TickConfig, world_config: WorldConfig) -> Result<Self, EcsError> {
        let mut world = World::builder()
            .with_config(world_config)
            .component::<Position>()
            .component::<Velocity>()
            .component::<Lifetime>()
            .resource::<SimClock>()
            .resource::<SpawnTimer>()
            .build()?;

        world
            .commands()
            .create_resource(SimClock::default())?
            .create_resource(SpawnTimer::new(config.spawn_every))?;

        Ok(Self {
            tick_id: 0,
            config,
            world,
        })
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run one tick of the simulation.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError`] on any contract violation inside a phase. Running
    /// out of entity indices is not an error; the spawn is skipped.
    pub fn tick(&mut self, dt: f64) -> Result<TickStats, EcsError> {
        self.tick_id += 1;

        let spawned = self.spawn()?;
        let moved = self.integrate(dt as f32)?;
        let expired = self.expire()?;

        let mut commands = self.world.commands();
        let clock = commands.get_resource::<SimClock>()?;
        clock.ticks += 1;
        clock.elapsed += dt;

        let stats = TickStats {
            spawned,
            moved,
            expired,
            live: self.world.entity_count(),
        };
        debug!(
            tick_id = self.tick_id,
            spawned, moved, expired, live = stats.live, "tick complete"
        );
        Ok(stats)
    }

    fn spawn(&mut self) -> Result<usize, EcsError> {
        let mut commands = self.world.commands();
        let timer = commands.get_resource::<SpawnTimer>()?;
        if !timer.advance() {
            return Ok(0);
        }
        let n = timer.spawned;
        timer.spawned += 1;

        let angle = n as f32 * 0.618_034 * std::f32::consts::TAU;
        let position = Position(Vec3::ZERO);
        let lifetime = Lifetime {
            remaining: self.config.lifetime_ticks,
        };
        let created = if n % 3 == 2 {
            commands.create_entity((position, lifetime))
        } else {
            let velocity = Velocity(Vec3::new(angle.cos(), angle.sin(), 0.0));
            commands.create_entity((position, velocity, lifetime))
        };

        match created {
            Ok(entity) => {
                debug!(%entity, "spawned entity");
                Ok(1)
            }
            Err(EcsError::EntityLimitReached { max }) => {
                warn!(tick_id = self.tick_id, max, "entity limit reached, skipping spawn");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn integrate(&mut self, dt: f32) -> Result<usize, EcsError> {
        let movers = self.world.query().entities::<(Position, Velocity)>()?;
        let mut commands = self.world.commands();
        for &entity in &movers {
            let velocity = *commands.get_component::<Velocity>(entity)?;
            commands.get_component::<Position>(entity)?.0 += velocity.0 * dt;
        }
        Ok(movers.len())
    }

    fn expire(&mut self) -> Result<usize, EcsError> {
        let aging = self.world.query().entities::<(Lifetime,)>()?;
        let mut commands = self.world.commands();
        let mut expired: Vec<Entity> = Vec::new();
        for entity in aging {
            let lifetime = commands.get_component::<Lifetime>(entity)?;
            lifetime.remaining = lifetime.remaining.saturating_sub(1);
            if lifetime.remaining == 0 {
                expired.push(entity);
            }
        }
        for &entity in &expired {
            commands.remove_entity(entity)?;
        }
        Ok(expired.len())
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// # Errors
    ///
    /// Stops at the first tick that fails.
    pub fn run(&mut self) -> Result<(), EcsError> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let dt = tick_duration.as_secs_f64();
            let stats = self.tick(dt)?;

            tick_count += 1;
            if tick_count % 60 == 0 {
                info!(
                    tick_id = self.tick_id,
                    live = stats.live,
                    moved = stats.moved,
                    "simulation progress"
                );
            }
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, live = stats.live, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}
