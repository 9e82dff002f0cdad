#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A headless chunk-based voxel world engine: procedural terrain generation,
//! block editing, mesh extraction and persistence, with generation and
//! meshing running on a worker thread pool.
//!
//! ## Key Modules
//!
//! * `voxels` - Block registry, chunk storage, noise, terrain generation,
//!   the world's chunk map and persistence
//! * `meshing` - Face-culled mesh extraction with per-vertex ambient occlusion
//! * `task_management` - The worker pool for background chunk work
//! * `engine` - The per-frame driver tying the above together
//! * `core` - Shared concurrency primitives
//!
//! ## Architecture
//!
//! The world is a sparse map of 16x256x16 chunk columns streamed around a
//! moving center. The main thread is the only writer of world state; workers
//! produce values (generated voxel contents, extracted meshes) that the main
//! thread commits, so cancellation is just discarding a result whose chunk is
//! gone. Everything generated is a pure function of the world seed, which is
//! what makes the save format (seed plus edited chunks) sufficient.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cgmath::Point3;
//! use voxel_world::engine::WorldEngine;
//! use voxel_world::meshing::{atlas::TextureAtlas, Mesher};
//! use voxel_world::voxels::block::registry::BlockRegistry;
//! use voxel_world::voxels::terrain::GenerationParams;
//! use voxel_world::voxels::world::{World, WorldConfig};
//!
//! let registry = Arc::new(BlockRegistry::with_defaults());
//! let world = World::new(
//!     registry.clone(),
//!     GenerationParams { seed: 42, ..GenerationParams::default() },
//!     WorldConfig::default(),
//! );
//! let mesher = Mesher::new(registry, Arc::new(TextureAtlas::with_defaults()));
//! let mut engine = WorldEngine::new(world, mesher, 4);
//!
//! loop {
//!     engine.update(Point3::new(0.0, 80.0, 0.0));
//!     // consume engine.meshes() ...
//! }
//! ```

pub mod core;
pub mod engine;
pub mod meshing;
pub mod task_management;
pub mod voxels;
