//! # World Module
//!
//! The `World` owns the sparse chunk map and is the single place where world
//! coordinates are translated to chunk-plus-local coordinates. Everything
//! above it (meshing, raycasts, the engine loop) addresses blocks in world
//! space and never does the floor-division arithmetic itself.
//!
//! ## Threading Contract
//!
//! The world is mutated by the main thread only. Worker threads receive
//! cloned [`MtResource`] chunk handles (or a handle to the whole world behind
//! its own lock) and take read guards; the main thread takes write guards when
//! committing generation output or applying edits. Chunk unloads therefore
//! cannot race a worker holding a handle: the worker's clone keeps the data
//! alive, and its result is discarded on commit if the chunk is gone from the
//! map (see [`World::commit_generated`]).
//!
//! ## Degraded Reads
//!
//! Block queries outside the vertical range or in unloaded chunks return air
//! rather than erroring. Edits to unloaded chunks are dropped with a `None`
//! return. This keeps meshing and physics total functions over all of world
//! space.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use cgmath::{InnerSpace, Point2, Point3, Vector3};
use log::{debug, warn};
use lru::LruCache;

use super::block::registry::BlockRegistry;
use super::block::{BlockId, AIR};
use super::chunk::codec::{self, BlockRun};
use super::chunk::{Chunk, CHUNK_DIMENSION, WORLD_HEIGHT};
use super::terrain::{GenerationParams, TerrainGenerator};
use crate::core::MtResource;

/// Step length in blocks for the fixed-step raycast walk. Small enough not to
/// tunnel through single-block walls at any angle.
const RAYCAST_STEP: f32 = 0.05;

/// Chunk streaming configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorldConfig {
    /// Chebyshev radius (in chunks) around the center that is kept loaded.
    pub load_radius: i32,
    /// Chunks beyond this Chebyshev radius are unloaded. Kept larger than
    /// `load_radius` so a center oscillating on a chunk border does not
    /// thrash load/unload cycles.
    pub unload_radius: i32,
    /// How many unloaded chunks keep their run-length encoded contents in
    /// memory so edits survive a revisit.
    pub retained_chunk_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            load_radius: 4,
            unload_radius: 6,
            retained_chunk_capacity: 512,
        }
    }
}

/// The result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World coordinates of the solid block that was hit.
    pub block: Point3<i32>,
    /// Unit axis vector pointing from the hit block back toward the ray, i.e.
    /// the face the ray entered through. Zero on the rare corner crossing.
    pub normal: Vector3<i32>,
    /// Distance from the ray origin to the hit, in blocks.
    pub distance: f32,
    /// The id of the block that was hit.
    pub id: BlockId,
}

/// Maps a world axis coordinate to its chunk coordinate (floor division, so
/// negative coordinates map correctly: world x -1 is chunk -1, local 15).
pub fn chunk_axis_of(world: i32) -> i32 {
    world.div_euclid(CHUNK_DIMENSION)
}

/// Maps a world axis coordinate to its local coordinate within the chunk.
pub fn local_axis_of(world: i32) -> i32 {
    world.rem_euclid(CHUNK_DIMENSION)
}

/// The sparse voxel world: loaded chunks, the dirty set, and the streaming
/// policy around a moving center.
pub struct World {
    chunks: HashMap<Point2<i32>, MtResource<Chunk>>,
    /// Coordinates of loaded chunks whose contents changed since the last
    /// [`World::drain_dirty_chunks`].
    dirty: HashSet<Point2<i32>>,
    registry: Arc<BlockRegistry>,
    generator: Arc<TerrainGenerator>,
    /// Run-length encoded contents of recently unloaded chunks, so edits
    /// survive leaving and re-entering an area without touching disk.
    retained: LruCache<Point2<i32>, Vec<BlockRun>>,
    config: WorldConfig,
}

impl World {
    /// Creates an empty world over the given registry and generation
    /// parameters. No chunks are loaded yet.
    pub fn new(registry: Arc<BlockRegistry>, params: GenerationParams, config: WorldConfig) -> Self {
        let generator = Arc::new(TerrainGenerator::new(registry.clone(), params));
        let capacity =
            NonZeroUsize::new(config.retained_chunk_capacity).unwrap_or(NonZeroUsize::MIN);
        World {
            chunks: HashMap::new(),
            dirty: HashSet::new(),
            registry,
            generator,
            retained: LruCache::new(capacity),
            config,
        }
    }

    /// The block registry this world was built over.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// The terrain generator, shareable with worker threads.
    pub fn generator(&self) -> &Arc<TerrainGenerator> {
        &self.generator
    }

    /// The streaming configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Converts world block coordinates to the owning chunk's coordinates.
    pub fn chunk_coord_of(world_x: i32, world_z: i32) -> Point2<i32> {
        Point2::new(chunk_axis_of(world_x), chunk_axis_of(world_z))
    }

    /// Converts world block coordinates to coordinates local to their chunk.
    pub fn local_coord_of(world_x: i32, world_z: i32) -> (i32, i32) {
        (local_axis_of(world_x), local_axis_of(world_z))
    }

    /// Whether the chunk at the given chunk coordinates is loaded.
    pub fn is_chunk_loaded(&self, coord: Point2<i32>) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of currently loaded chunks.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Coordinates of every loaded chunk, in arbitrary order.
    pub fn loaded_chunk_coords(&self) -> impl Iterator<Item = Point2<i32>> + '_ {
        self.chunks.keys().copied()
    }

    /// Returns a cloned handle to a loaded chunk, for handing to workers.
    pub fn chunk_handle(&self, coord: Point2<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&coord).cloned()
    }

    /// Returns the block at the given world coordinates.
    ///
    /// Out-of-range heights and unloaded chunks read as air.
    pub fn get_block(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockId {
        if !(0..WORLD_HEIGHT).contains(&world_y) {
            return AIR;
        }
        let coord = Self::chunk_coord_of(world_x, world_z);
        match self.chunks.get(&coord) {
            Some(chunk) => {
                let (local_x, local_z) = Self::local_coord_of(world_x, world_z);
                chunk.get().block_at(local_x, world_y, local_z)
            }
            None => AIR,
        }
    }

    /// Returns true if the block at the given world coordinates is solid.
    /// Unloaded space is not solid.
    pub fn is_solid(&self, world_x: i32, world_y: i32, world_z: i32) -> bool {
        if !(0..WORLD_HEIGHT).contains(&world_y) {
            return false;
        }
        let coord = Self::chunk_coord_of(world_x, world_z);
        match self.chunks.get(&coord) {
            Some(chunk) => {
                let (local_x, local_z) = Self::local_coord_of(world_x, world_z);
                chunk.get().is_block_solid(local_x, world_y, local_z)
            }
            None => false,
        }
    }

    /// Sets the block at the given world coordinates and returns the previous
    /// id, or `None` if the position is out of range or its chunk is not
    /// loaded (the edit is dropped, not queued).
    ///
    /// A change on a chunk border also dirties the adjacent loaded neighbor,
    /// whose mesh may cull faces against this block.
    pub fn set_block(
        &mut self,
        world_x: i32,
        world_y: i32,
        world_z: i32,
        id: BlockId,
    ) -> Option<BlockId> {
        if !(0..WORLD_HEIGHT).contains(&world_y) {
            return None;
        }
        let coord = Self::chunk_coord_of(world_x, world_z);
        let Some(chunk) = self.chunks.get(&coord) else {
            debug!(
                "dropping edit at ({}, {}, {}): chunk ({}, {}) not loaded",
                world_x, world_y, world_z, coord.x, coord.y
            );
            return None;
        };

        let (local_x, local_z) = Self::local_coord_of(world_x, world_z);
        let solid = self.registry.is_solid(id);
        let previous = chunk
            .get_mut()
            .set_block_at(local_x, world_y, local_z, id, solid);
        if previous == id {
            return Some(previous);
        }

        self.dirty.insert(coord);
        if local_x == 0 {
            self.mark_dirty(Point2::new(coord.x - 1, coord.y));
        } else if local_x == CHUNK_DIMENSION - 1 {
            self.mark_dirty(Point2::new(coord.x + 1, coord.y));
        }
        if local_z == 0 {
            self.mark_dirty(Point2::new(coord.x, coord.y - 1));
        } else if local_z == CHUNK_DIMENSION - 1 {
            self.mark_dirty(Point2::new(coord.x, coord.y + 1));
        }
        Some(previous)
    }

    /// Marks a loaded chunk as needing a remesh. No-op for unloaded chunks.
    pub fn mark_dirty(&mut self, coord: Point2<i32>) {
        if let Some(chunk) = self.chunks.get(&coord) {
            chunk.get_mut().mark_dirty();
            self.dirty.insert(coord);
        }
    }

    /// Loads the chunk at the given coordinates, generating it synchronously.
    ///
    /// Idempotent: loading an already-loaded chunk does nothing. If the chunk
    /// was recently unloaded its retained contents are restored instead of
    /// regenerating, so player edits survive a revisit; corrupt retained data
    /// falls back to regeneration.
    pub fn load_chunk(&mut self, coord: Point2<i32>) {
        if self.is_chunk_loaded(coord) {
            return;
        }

        let mut chunk = Chunk::new(coord);
        match self.retained.pop(&coord) {
            Some(runs) => match codec::decode_chunk(&runs) {
                Ok(voxels) => chunk.replace_contents(voxels, &self.registry),
                Err(error) => {
                    warn!(
                        "retained chunk ({}, {}) is corrupt ({}), regenerating",
                        coord.x, coord.y, error
                    );
                    self.generator.generate_chunk(&mut chunk);
                }
            },
            None => self.generator.generate_chunk(&mut chunk),
        }

        self.insert_chunk(chunk);
    }

    /// Inserts a pre-generated chunk into the map, dirtying it and its loaded
    /// neighbors (their border faces may now be culled differently).
    fn insert_chunk(&mut self, chunk: Chunk) {
        let coord = chunk.position();
        self.chunks.insert(coord, MtResource::new(chunk));
        self.dirty.insert(coord);
        for neighbor in Self::neighbor_coords(coord) {
            self.mark_dirty(neighbor);
        }
    }

    /// Loads an empty, ungenerated chunk so a worker can fill it
    /// asynchronously via [`World::commit_generated`].
    pub fn load_chunk_deferred(&mut self, coord: Point2<i32>) -> bool {
        if self.is_chunk_loaded(coord) {
            return false;
        }
        if let Some(runs) = self.retained.pop(&coord) {
            // Retained contents restore synchronously; decoding is cheap
            // compared to generation.
            match codec::decode_chunk(&runs) {
                Ok(voxels) => {
                    let mut chunk = Chunk::new(coord);
                    chunk.replace_contents(voxels, &self.registry);
                    self.insert_chunk(chunk);
                    return false;
                }
                Err(error) => {
                    warn!(
                        "retained chunk ({}, {}) is corrupt ({}), regenerating",
                        coord.x, coord.y, error
                    );
                }
            }
        }
        self.chunks.insert(coord, MtResource::new(Chunk::new(coord)));
        true
    }

    /// Commits worker-produced voxel contents into a loaded, ungenerated
    /// chunk. Returns false if the result was discarded: either the chunk was
    /// unloaded while generation ran (the cancellation path) or it was
    /// already generated by a competing path.
    pub fn commit_generated(&mut self, coord: Point2<i32>, voxels: Vec<BlockId>) -> bool {
        let Some(chunk) = self.chunks.get(&coord) else {
            debug!(
                "discarding generated contents for unloaded chunk ({}, {})",
                coord.x, coord.y
            );
            return false;
        };
        {
            let mut chunk = chunk.get_mut();
            if chunk.is_generated() {
                return false;
            }
            chunk.replace_contents(voxels, &self.registry);
        }
        self.dirty.insert(coord);
        for neighbor in Self::neighbor_coords(coord) {
            self.mark_dirty(neighbor);
        }
        true
    }

    /// Unloads the chunk at the given coordinates, retaining its encoded
    /// contents for a later revisit. No-op if the chunk is not loaded.
    pub fn unload_chunk(&mut self, coord: Point2<i32>) {
        let Some(chunk) = self.chunks.remove(&coord) else {
            return;
        };
        self.dirty.remove(&coord);
        {
            let chunk = chunk.get();
            if chunk.is_generated() {
                self.retained.put(coord, codec::encode_chunk(&chunk));
            }
        }
        // Neighbor faces against this chunk become exposed.
        for neighbor in Self::neighbor_coords(coord) {
            self.mark_dirty(neighbor);
        }
    }

    fn neighbor_coords(coord: Point2<i32>) -> [Point2<i32>; 4] {
        [
            Point2::new(coord.x - 1, coord.y),
            Point2::new(coord.x + 1, coord.y),
            Point2::new(coord.x, coord.y - 1),
            Point2::new(coord.x, coord.y + 1),
        ]
    }

    /// Loads every chunk within the load radius of `center` (in chunk
    /// coordinates) and unloads chunks beyond the unload radius. Idempotent
    /// for a stationary center.
    pub fn update_around_center(&mut self, center: Point2<i32>) {
        let to_unload: Vec<Point2<i32>> = self
            .chunks
            .keys()
            .filter(|coord| {
                let dx = (coord.x - center.x).abs();
                let dz = (coord.y - center.y).abs();
                dx.max(dz) > self.config.unload_radius
            })
            .copied()
            .collect();
        for coord in to_unload {
            self.unload_chunk(coord);
        }

        let radius = self.config.load_radius;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                self.load_chunk(Point2::new(center.x + dx, center.y + dz));
            }
        }
    }

    /// True if any loaded chunk is waiting for a remesh.
    pub fn has_dirty_chunks(&self) -> bool {
        self.dirty.iter().any(|coord| self.chunks.contains_key(coord))
    }

    /// Takes the set of chunks needing a remesh, sorted by chunk coordinates
    /// for deterministic scheduling order.
    pub fn drain_dirty_chunks(&mut self) -> Vec<Point2<i32>> {
        let mut coords: Vec<Point2<i32>> = self
            .dirty
            .drain()
            .filter(|coord| self.chunks.contains_key(coord))
            .collect();
        coords.sort_by_key(|coord| (coord.x, coord.y));
        coords
    }

    /// Restores a chunk from a persisted run-length stream, replacing any
    /// loaded contents. Corrupt streams are regenerated from the seed instead.
    pub fn restore_chunk(&mut self, coord: Point2<i32>, runs: &[BlockRun]) {
        let mut chunk = Chunk::new(coord);
        match codec::decode_chunk(runs) {
            Ok(voxels) => chunk.replace_contents(voxels, &self.registry),
            Err(error) => {
                warn!(
                    "saved chunk ({}, {}) is corrupt ({}), regenerating",
                    coord.x, coord.y, error
                );
                self.generator.generate_chunk(&mut chunk);
            }
        }
        self.chunks.remove(&coord);
        self.retained.pop(&coord);
        self.insert_chunk(chunk);
    }

    /// Walks a ray through the world and returns the first solid block hit.
    ///
    /// Fixed-step sampling at [`RAYCAST_STEP`] increments; `direction` need
    /// not be normalized. Returns `None` for a zero direction or when nothing
    /// solid lies within `max_distance` blocks.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        let step = direction.normalize() * RAYCAST_STEP;

        let voxel_of = |p: Point3<f32>| {
            Point3::new(
                p.x.floor() as i32,
                p.y.floor() as i32,
                p.z.floor() as i32,
            )
        };

        let mut position = origin;
        let mut previous = voxel_of(position);
        let mut traveled = 0.0;
        while traveled <= max_distance {
            let voxel = voxel_of(position);
            if self.is_solid(voxel.x, voxel.y, voxel.z) {
                let delta = previous - voxel;
                let normal = Vector3::new(
                    delta.x.clamp(-1, 1),
                    delta.y.clamp(-1, 1),
                    delta.z.clamp(-1, 1),
                );
                return Some(RayHit {
                    block: voxel,
                    normal,
                    distance: traveled,
                    id: self.get_block(voxel.x, voxel.y, voxel.z),
                });
            }
            previous = voxel;
            position += step;
            traveled += RAYCAST_STEP;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world() -> World {
        let params = GenerationParams {
            seed: 42,
            height_offset: 64,
            amplitude: 0.0,
            tree_density: 0.0,
            ..GenerationParams::default()
        };
        let config = WorldConfig {
            load_radius: 2,
            unload_radius: 3,
            retained_chunk_capacity: 64,
        };
        World::new(Arc::new(BlockRegistry::with_defaults()), params, config)
    }

    #[test]
    fn coordinate_mapping_handles_negatives() {
        assert_eq!(World::chunk_coord_of(0, 0), Point2::new(0, 0));
        assert_eq!(World::chunk_coord_of(15, 15), Point2::new(0, 0));
        assert_eq!(World::chunk_coord_of(16, 31), Point2::new(1, 1));
        assert_eq!(World::chunk_coord_of(-1, -16), Point2::new(-1, -1));
        assert_eq!(World::chunk_coord_of(-17, -33), Point2::new(-2, -3));

        assert_eq!(World::local_coord_of(-1, -16), (15, 0));
        assert_eq!(World::local_coord_of(-17, 18), (15, 2));
    }

    #[test]
    fn chunk_and_local_coordinates_recompose_exactly() {
        for world in -1000..1000 {
            assert_eq!(
                chunk_axis_of(world) * CHUNK_DIMENSION + local_axis_of(world),
                world
            );
            assert!((0..CHUNK_DIMENSION).contains(&local_axis_of(world)));
        }
    }

    #[test]
    fn unloaded_space_reads_as_air() {
        let world = flat_world();
        assert_eq!(world.get_block(100, 10, 100), AIR);
        assert!(!world.is_solid(100, 10, 100));
        assert_eq!(world.get_block(0, -1, 0), AIR);
        assert_eq!(world.get_block(0, WORLD_HEIGHT, 0), AIR);
    }

    #[test]
    fn edits_to_unloaded_chunks_are_dropped() {
        let mut world = flat_world();
        let stone = world.registry().id_of("stone").unwrap();
        assert_eq!(world.set_block(100, 10, 100, stone), None);
        world.load_chunk(World::chunk_coord_of(100, 100));
        assert_ne!(world.get_block(100, 10, 100), stone);
    }

    #[test]
    fn load_chunk_is_idempotent_and_preserves_edits() {
        let mut world = flat_world();
        let coord = Point2::new(0, 0);
        let stone = world.registry().id_of("stone").unwrap();

        world.load_chunk(coord);
        assert_eq!(world.loaded_chunk_count(), 1);
        world.set_block(5, 80, 5, stone).unwrap();

        world.load_chunk(coord);
        assert_eq!(world.loaded_chunk_count(), 1);
        assert_eq!(world.get_block(5, 80, 5), stone, "reload must not regenerate");
    }

    #[test]
    fn retention_cache_restores_edits_after_unload() {
        let mut world = flat_world();
        let coord = Point2::new(2, -3);
        let stone = world.registry().id_of("stone").unwrap();

        world.load_chunk(coord);
        let world_x = coord.x * CHUNK_DIMENSION + 4;
        let world_z = coord.y * CHUNK_DIMENSION + 9;
        world.set_block(world_x, 90, world_z, stone).unwrap();

        world.unload_chunk(coord);
        assert!(!world.is_chunk_loaded(coord));
        assert_eq!(world.get_block(world_x, 90, world_z), AIR);

        world.load_chunk(coord);
        assert_eq!(world.get_block(world_x, 90, world_z), stone);
    }

    #[test]
    fn boundary_edit_dirties_the_adjacent_chunk() {
        let mut world = flat_world();
        world.load_chunk(Point2::new(0, 0));
        world.load_chunk(Point2::new(1, 0));
        world.drain_dirty_chunks();

        let stone = world.registry().id_of("stone").unwrap();
        // World x 16 is local x 0 of chunk (1, 0).
        world.set_block(16, 64, 8, stone).unwrap();

        let dirty = world.drain_dirty_chunks();
        assert!(dirty.contains(&Point2::new(1, 0)));
        assert!(dirty.contains(&Point2::new(0, 0)));
        assert!(!dirty.contains(&Point2::new(2, 0)), "chunk (2,0) is unloaded");
    }

    #[test]
    fn interior_edit_dirties_only_its_own_chunk() {
        let mut world = flat_world();
        world.load_chunk(Point2::new(0, 0));
        world.load_chunk(Point2::new(1, 0));
        world.drain_dirty_chunks();

        let stone = world.registry().id_of("stone").unwrap();
        world.set_block(8, 64, 8, stone).unwrap();
        assert_eq!(world.drain_dirty_chunks(), vec![Point2::new(0, 0)]);
    }

    #[test]
    fn update_around_center_loads_the_radius_and_is_idempotent() {
        let mut world = flat_world();
        let center = Point2::new(0, 0);
        world.update_around_center(center);

        let expected = (2 * world.config.load_radius + 1).pow(2) as usize;
        assert_eq!(world.loaded_chunk_count(), expected);

        world.drain_dirty_chunks();
        world.update_around_center(center);
        assert_eq!(world.loaded_chunk_count(), expected);
        assert!(
            world.drain_dirty_chunks().is_empty(),
            "a stationary center must not dirty anything"
        );
    }

    #[test]
    fn moving_the_center_unloads_distant_chunks() {
        let mut world = flat_world();
        world.update_around_center(Point2::new(0, 0));
        let far = Point2::new(100, 100);
        world.update_around_center(far);

        assert!(!world.is_chunk_loaded(Point2::new(0, 0)));
        assert!(world.is_chunk_loaded(far));
        assert_eq!(
            world.loaded_chunk_count(),
            (2 * world.config.load_radius + 1).pow(2) as usize
        );
    }

    #[test]
    fn drain_dirty_is_sorted_and_clears() {
        let mut world = flat_world();
        for coord in [Point2::new(5, 0), Point2::new(-10, 3), Point2::new(0, 0)] {
            world.load_chunk(coord);
        }
        let dirty = world.drain_dirty_chunks();
        assert_eq!(
            dirty,
            vec![Point2::new(-10, 3), Point2::new(0, 0), Point2::new(5, 0)]
        );
        assert!(world.drain_dirty_chunks().is_empty());
    }

    #[test]
    fn raycast_straight_down_hits_the_surface() {
        let mut world = flat_world();
        world.load_chunk(Point2::new(0, 0));

        let hit = world
            .raycast(
                Point3::new(8.5, 70.0, 8.5),
                Vector3::new(0.0, -1.0, 0.0),
                20.0,
            )
            .expect("flat ground below the origin");
        assert_eq!(hit.block, Point3::new(8, 63, 8));
        assert_eq!(hit.normal, Vector3::new(0, 1, 0));
        assert_eq!(hit.id, world.registry().id_of("grass").unwrap());
        assert!((hit.distance - 6.05).abs() < 0.2);
    }

    #[test]
    fn raycast_misses_when_nothing_is_in_range() {
        let mut world = flat_world();
        world.load_chunk(Point2::new(0, 0));
        assert!(world
            .raycast(
                Point3::new(8.0, 200.0, 8.0),
                Vector3::new(0.0, 1.0, 0.0),
                50.0
            )
            .is_none());
        assert!(world
            .raycast(
                Point3::new(8.0, 70.0, 8.0),
                Vector3::new(0.0, 0.0, 0.0),
                50.0
            )
            .is_none());
    }

    #[test]
    fn deferred_load_commits_worker_output() {
        let mut world = flat_world();
        let coord = Point2::new(0, 0);
        assert!(world.load_chunk_deferred(coord));
        assert!(world.is_chunk_loaded(coord));
        assert_eq!(world.get_block(5, 63, 5), AIR, "not generated yet");

        let voxels = world.generator().generate_voxels(coord);
        assert!(world.commit_generated(coord, voxels));
        assert_eq!(
            world.get_block(5, 63, 5),
            world.registry().id_of("grass").unwrap()
        );
    }

    #[test]
    fn commit_for_unloaded_chunk_is_discarded() {
        let mut world = flat_world();
        let coord = Point2::new(7, 7);
        let voxels = world.generator().generate_voxels(coord);
        assert!(!world.commit_generated(coord, voxels));
        assert!(!world.is_chunk_loaded(coord));
    }
}
