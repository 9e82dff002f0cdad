//! # Voxels Module
//!
//! The voxel data model and everything that produces or persists it:
//!
//! - [`block`]: block ids, per-type properties, and the registry catalog.
//! - [`noise`]: seeded gradient noise fields.
//! - [`chunk`]: the 16x256x16 storage unit and its run-length codec.
//! - [`terrain`]: noise-driven chunk generation.
//! - [`world`]: the sparse chunk map, streaming, edits, and raycasts.
//! - [`persistence`]: JSON world snapshots.

pub mod block;
pub mod chunk;
pub mod noise;
pub mod persistence;
pub mod terrain;
pub mod world;
