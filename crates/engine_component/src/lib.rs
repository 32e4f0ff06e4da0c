//! # engine_component
//!
//! The storage primitives of the ECS: how entities are identified, how
//! component membership is indexed, and how component values are pooled.
//!
//! This crate provides:
//!
//! - [`Component`] and [`Resource`] traits with dense [`ComponentId`]/[`ResourceId`]s.
//! - [`Entity`]: generational `(index, generation)` handles.
//! - [`EntityTable`]: per-entity component slot records with index reuse.
//! - [`SparseSet`]: O(1) membership index over a bounded domain.
//! - [`SlotPool`]: growable storage with LIFO slot reuse.
//! - [`ComponentChannel`]: one pool plus one sparse set per component type.
//! - [`QueryDescriptor`]: declared component signatures.

pub mod channel;
pub mod component;
pub mod entity;
pub mod error;
pub mod pool;
pub mod query;
pub mod sparse_set;

pub use channel::{ComponentChannel, ErasedChannel};
pub use component::{Component, ComponentId, ComponentMeta, Resource, ResourceId, ResourceMeta};
pub use entity::{Entity, EntityRecord, EntityTable};
pub use error::EcsError;
pub use pool::{SlotIndex, SlotPool};
pub use query::QueryDescriptor;
pub use sparse_set::{DEFAULT_MAX_VALUE, SparseSet};
