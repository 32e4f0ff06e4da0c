//! # engine_app
//!
//! Demo simulation over the sparse-set ECS. Spawns short-lived entities,
//! moves them, retires them when their lifetime runs out, and logs progress
//! from a fixed-timestep tick loop.
//!
//! The world configuration is read from an optional JSON file; command-line
//! flags override individual fields.

mod demo;
mod tick;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use engine_world::WorldConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tick::{TickConfig, TickLoop};

#[derive(Parser)]
#[command(name = "engine_app", about = "Sparse-set ECS demo simulation")]
struct Args {
    /// Path to a JSON world configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Largest entity index the world hands out
    #[arg(long)]
    max_entities: Option<u32>,

    /// Number of ticks to run (0 = unlimited)
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Target ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Ticks between spawns
    #[arg(long, default_value_t = 1)]
    spawn_every: u64,

    /// Lifetime of each spawned entity, in ticks
    #[arg(long, default_value_t = 120)]
    lifetime: u32,
}

fn load_world_config(path: &Path) -> Result<WorldConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading world config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing world config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut world_config = match &args.config {
        Some(path) => load_world_config(path)?,
        None => WorldConfig::default(),
    };
    if let Some(max) = args.max_entities {
        world_config = world_config.with_max_entity_index(max);
    }
    world_config.validate().context("invalid world config")?;
    anyhow::ensure!(args.tick_rate > 0.0, "tick rate must be positive");

    info!(
        max_entity_index = world_config.max_entity_index,
        initial_capacity = world_config.initial_capacity,
        "world configured"
    );

    let config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.ticks,
        spawn_every: args.spawn_every,
        lifetime_ticks: args.lifetime,
    };

    let mut tick_loop = TickLoop::new(config, world_config).context("building world")?;
    tick_loop.run()?;

    let world = tick_loop.world();
    info!(
        ticks = tick_loop.tick_id(),
        live = world.entity_count(),
        "simulation finished"
    );
    Ok(())
}
