//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size 16x256x16 column of
//! voxel data plus the per-chunk bookkeeping the rest of the engine relies on
//! (generation flag, dirty flag, mutation revision).
//!
//! ## Storage Layout
//!
//! Voxels are stored as a flat contiguous `Vec<BlockId>` indexed by
//! `(y * S * S) + (z * S) + x`, where `S` is [`CHUNK_DIMENSION`]. A parallel
//! [`BitVec`] solidity mask is maintained on every mutation so that solidity
//! checks (the hot query for meshing, ambient occlusion, and physics) never
//! need a registry lookup.
//!
//! ## Invariants
//!
//! - The voxel array length is constant for the chunk's lifetime.
//! - The chunk coordinate is immutable after construction.
//! - `dirty` is set on any voxel mutation and cleared only after a mesh has
//!   been produced from the current contents (see [`Chunk::acknowledge_mesh`]).
//!
//! Neighbor chunks are never stored here; they are resolved on demand through
//! the world's chunk map, so unloading a neighbor can never leave a dangling
//! reference.

use bitvec::prelude::BitVec;
use cgmath::Point2;

use super::block::registry::BlockRegistry;
use super::block::{BlockId, AIR};

pub mod codec;

/// The edge length of a chunk in blocks along the X and Z axes.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single horizontal plane of a chunk.
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// World height in blocks; chunks span the full height as columns.
pub const WORLD_HEIGHT: i32 = 256;
/// The total number of voxels in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_PLANE_SIZE * WORLD_HEIGHT) as usize;

/// A 16x256x16 column of voxels, the unit of generation, loading and meshing.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates; `position.y` is the
    /// chunk-space Z coordinate.
    position: Point2<i32>,
    /// Flat voxel storage, indexed by [`Chunk::voxel_index`].
    voxels: Vec<BlockId>,
    /// One bit per voxel: whether the block there is solid. Kept in sync with
    /// `voxels` on every mutation.
    solid_mask: BitVec,
    /// Whether terrain generation has filled this chunk.
    generated: bool,
    /// Whether the stored blocks have changed since the last mesh extraction.
    dirty: bool,
    /// Monotonic mutation counter; lets a mesh produced from older contents
    /// be recognized as stale.
    revision: u64,
}

impl Chunk {
    /// Creates a new, ungenerated chunk filled with air.
    pub fn new(position: Point2<i32>) -> Self {
        Chunk {
            position,
            voxels: vec![AIR; CHUNK_VOLUME],
            solid_mask: BitVec::repeat(false, CHUNK_VOLUME),
            generated: false,
            dirty: false,
            revision: 0,
        }
    }

    /// The chunk coordinates of this chunk.
    pub fn position(&self) -> Point2<i32> {
        self.position
    }

    /// Converts local block coordinates to an index into the flat voxel array.
    ///
    /// Callers must ensure the coordinates are in bounds (see
    /// [`Chunk::in_bounds`]).
    pub fn voxel_index(x: i32, y: i32, z: i32) -> usize {
        debug_assert!(Self::in_bounds(x, y, z));
        (y * CHUNK_PLANE_SIZE + z * CHUNK_DIMENSION + x) as usize
    }

    /// Returns true if the local coordinates address a voxel in this chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..WORLD_HEIGHT).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    /// Returns the block id at the given local coordinates.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.voxels[Self::voxel_index(x, y, z)]
    }

    /// Returns true if the block at the given local coordinates is solid.
    ///
    /// O(1) via the solidity mask; no registry lookup.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.solid_mask[Self::voxel_index(x, y, z)]
    }

    /// Sets the block at the given local coordinates and returns the previous
    /// id.
    ///
    /// `solid` is the solidity of the new block per the registry; the caller
    /// resolves it so the chunk itself never needs a registry reference. If
    /// the value actually changes, the chunk is marked dirty and its revision
    /// advances.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, id: BlockId, solid: bool) -> BlockId {
        let index = Self::voxel_index(x, y, z);
        let previous = self.voxels[index];
        if previous == id {
            return previous;
        }
        self.voxels[index] = id;
        self.solid_mask.set(index, solid);
        self.mark_dirty();
        previous
    }

    /// Replaces the entire voxel contents, rebuilding the solidity mask from
    /// the registry. Used when committing generation output or decoding a
    /// saved chunk.
    ///
    /// # Panics
    /// Panics if `voxels` does not have exactly [`CHUNK_VOLUME`] entries; the
    /// voxel array length is constant for a chunk's lifetime.
    pub fn replace_contents(&mut self, voxels: Vec<BlockId>, registry: &BlockRegistry) {
        assert_eq!(
            voxels.len(),
            CHUNK_VOLUME,
            "chunk contents must cover the full volume"
        );
        self.solid_mask = voxels.iter().map(|id| registry.is_solid(*id)).collect();
        self.voxels = voxels;
        self.generated = true;
        self.mark_dirty();
    }

    /// Read-only view of the flat voxel array, for encoding and meshing.
    pub fn voxels(&self) -> &[BlockId] {
        &self.voxels
    }

    /// Whether terrain generation has filled this chunk.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Marks the chunk as generated without touching its contents. Used by
    /// generators that write voxels through [`Chunk::set_block_at`].
    pub fn set_generated(&mut self) {
        self.generated = true;
    }

    /// Whether the stored blocks changed since the last acknowledged mesh.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the chunk as needing a remesh and advances the revision counter.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// The current mutation revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Records that a mesh was produced from the contents at `revision`.
    ///
    /// Clears the dirty flag only if no mutation happened since that revision
    /// was captured; a stale acknowledgement leaves the chunk dirty so a
    /// fresh mesh gets scheduled instead of the edit being silently dropped.
    pub fn acknowledge_mesh(&mut self, revision: u64) -> bool {
        if self.revision == revision {
            self.dirty = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::registry::BlockRegistry;
    use crate::voxels::block::BlockProperties;

    fn test_registry() -> BlockRegistry {
        let mut registry = BlockRegistry::new();
        registry
            .register(BlockProperties::opaque("stone", 1.5, "stone"))
            .unwrap();
        registry
    }

    #[test]
    fn new_chunk_is_air_and_clean() {
        let chunk = Chunk::new(Point2::new(3, -2));
        assert_eq!(chunk.position(), Point2::new(3, -2));
        assert!(!chunk.is_generated());
        assert!(!chunk.is_dirty());
        assert_eq!(chunk.block_at(0, 0, 0), AIR);
        assert_eq!(chunk.block_at(15, 255, 15), AIR);
    }

    #[test]
    fn voxel_index_matches_layout_contract() {
        assert_eq!(Chunk::voxel_index(0, 0, 0), 0);
        assert_eq!(Chunk::voxel_index(1, 0, 0), 1);
        assert_eq!(Chunk::voxel_index(0, 0, 1), CHUNK_DIMENSION as usize);
        assert_eq!(Chunk::voxel_index(0, 1, 0), CHUNK_PLANE_SIZE as usize);
        assert_eq!(
            Chunk::voxel_index(15, 255, 15),
            CHUNK_VOLUME - 1,
            "last voxel must map to the last slot"
        );
    }

    #[test]
    fn set_block_updates_mask_dirty_and_revision() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        let before = chunk.revision();

        let previous = chunk.set_block_at(4, 10, 7, 1, true);
        assert_eq!(previous, AIR);
        assert!(chunk.is_dirty());
        assert!(chunk.is_block_solid(4, 10, 7));
        assert!(chunk.revision() > before);
    }

    #[test]
    fn redundant_set_block_does_not_dirty() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.set_block_at(1, 1, 1, 1, true);
        chunk.acknowledge_mesh(chunk.revision());
        assert!(!chunk.is_dirty());

        chunk.set_block_at(1, 1, 1, 1, true);
        assert!(!chunk.is_dirty(), "no-op write must not dirty the chunk");
    }

    #[test]
    fn stale_mesh_acknowledgement_keeps_chunk_dirty() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.set_block_at(0, 0, 0, 1, true);
        let captured = chunk.revision();

        // An edit lands while the mesh for `captured` is still in flight.
        chunk.set_block_at(1, 0, 0, 1, true);

        assert!(!chunk.acknowledge_mesh(captured));
        assert!(chunk.is_dirty());
        assert!(chunk.acknowledge_mesh(chunk.revision()));
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn replace_contents_rebuilds_solidity() {
        let registry = test_registry();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        let mut voxels = vec![AIR; CHUNK_VOLUME];
        voxels[Chunk::voxel_index(2, 3, 4)] = 1;
        chunk.replace_contents(voxels, &registry);

        assert!(chunk.is_generated());
        assert!(chunk.is_dirty());
        assert!(chunk.is_block_solid(2, 3, 4));
        assert!(!chunk.is_block_solid(0, 0, 0));
    }

    #[test]
    #[should_panic(expected = "full volume")]
    fn replace_contents_rejects_wrong_length() {
        let registry = test_registry();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.replace_contents(vec![AIR; 10], &registry);
    }
}
