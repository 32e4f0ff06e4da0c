//! # engine_world
//!
//! The registry and facades of the ECS. A [`World`] is declared once with a
//! fixed list of component and resource types, then mutated only through
//! [`Commands`] and read through [`Queryer`].
//!
//! ```rust
//! use engine_component::{Component, Resource};
//! use engine_world::World;
//!
//! #[derive(Debug, PartialEq)]
//! struct Position(i32);
//! impl Component for Position {
//!     fn type_name() -> &'static str { "Position" }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct Velocity(i32);
//! impl Component for Velocity {
//!     fn type_name() -> &'static str { "Velocity" }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct Timer(u32);
//! impl Resource for Timer {
//!     fn type_name() -> &'static str { "Timer" }
//! }
//!
//! let mut world = World::builder()
//!     .component::<Position>()
//!     .component::<Velocity>()
//!     .resource::<Timer>()
//!     .build()
//!     .unwrap();
//!
//! let mut commands = world.commands();
//! let moving = commands.create_entity((Position(0), Velocity(2))).unwrap();
//! commands.create_entity((Position(5),)).unwrap();
//! commands.create_resource(Timer(321)).unwrap();
//!
//! let movers = world.query().entities::<(Position, Velocity)>().unwrap();
//! for entity in movers {
//!     let mut commands = world.commands();
//!     let dx = commands.get_component::<Velocity>(entity).unwrap().0;
//!     commands.get_component::<Position>(entity).unwrap().0 += dx;
//! }
//!
//! assert_eq!(world.query().component::<Position>(moving), Ok(&Position(2)));
//! ```

pub mod bundle;
pub mod commands;
pub mod config;
pub mod query;
pub mod registry;
pub mod resource;
pub mod world;

pub use bundle::{Bundle, ComponentSet};
pub use commands::Commands;
pub use config::{MAX_ENTITY_INDEX_LIMIT, WorldConfig};
pub use query::Queryer;
pub use registry::TypeRegistry;
pub use resource::ResourceSlot;
pub use world::{World, WorldBuilder};
