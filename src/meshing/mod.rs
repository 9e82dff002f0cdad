//! # Meshing Module
//!
//! Converts chunk voxel data into renderable face buffers.
//!
//! ## Visibility
//!
//! A face is emitted only where it can be seen: the neighboring voxel must be
//! air or transparent, and two adjacent transparent voxels of the same type
//! (water against water) share no face. Neighbors are resolved within the
//! chunk where possible and through the world's chunk map across chunk
//! borders; an unloaded neighbor chunk reads as air, so border faces appear
//! until the neighbor loads and the chunk is remeshed.
//!
//! ## Ambient Occlusion
//!
//! Each vertex carries a brightness factor computed from the three voxels
//! diagonally adjacent to its corner on the face's outside plane. Corners
//! crowded by solid blocks darken, which grounds edges and creases without
//! any lighting pass.
//!
//! ## Threading
//!
//! The mesher holds only immutable shared state (registry and atlas) and
//! [`Mesher::extract_mesh`] takes the chunk and world by shared reference, so
//! extraction runs on worker threads against read guards.

use std::collections::HashSet;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::warn;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::block::{BlockId, AIR};
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION, WORLD_HEIGHT};
use crate::voxels::world::World;

pub mod atlas;
pub mod vertex;

use atlas::TextureAtlas;
use vertex::{FaceBuffer, FaceVertex};

/// How strongly a fully occluded corner darkens, as a fraction of full
/// brightness. 0.6 leaves a fully crowded corner at 0.4 brightness.
const AO_STRENGTH: f32 = 0.6;

/// Index pattern for one face's two triangles, counter-clockwise when viewed
/// from outside.
const FACE_INDICES: [u32; 6] = [0, 1, 3, 0, 3, 2];

/// Extracts face buffers from chunks.
pub struct Mesher {
    registry: Arc<BlockRegistry>,
    atlas: Arc<TextureAtlas>,
}

impl Mesher {
    /// Creates a mesher over the given registry and atlas.
    pub fn new(registry: Arc<BlockRegistry>, atlas: Arc<TextureAtlas>) -> Self {
        Mesher { registry, atlas }
    }

    /// Extracts the visible faces of a chunk into a [`FaceBuffer`].
    ///
    /// `world` is consulted only for voxels outside the chunk (cross-border
    /// culling and ambient occlusion); the chunk's own voxels are read
    /// directly. Faces whose texture has no atlas region are skipped with a
    /// warning.
    pub fn extract_mesh(&self, chunk: &Chunk, world: &World) -> FaceBuffer {
        let mut buffer = FaceBuffer::new(chunk.position());
        let mut missing_textures: HashSet<String> = HashSet::new();

        for y in 0..WORLD_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let id = chunk.block_at(x, y, z);
                    if id == AIR {
                        continue;
                    }
                    self.emit_voxel(chunk, world, &mut buffer, &mut missing_textures, x, y, z, id);
                }
            }
        }

        buffer
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_voxel(
        &self,
        chunk: &Chunk,
        world: &World,
        buffer: &mut FaceBuffer,
        missing_textures: &mut HashSet<String>,
        x: i32,
        y: i32,
        z: i32,
        id: BlockId,
    ) {
        let block = self.registry.get(id);
        let voxel = Point3::new(x, y, z);

        for side in BlockSide::all() {
            let normal = side.normal();
            let neighbor = voxel + normal;
            let neighbor_id = self.block_beyond(chunk, world, neighbor);
            if neighbor_id == id && block.transparent {
                continue; // no internal faces within a transparent volume
            }
            if !self.registry.is_transparent(neighbor_id) {
                continue;
            }

            let texture = block.texture_for(side);
            let Some(rect) = self.atlas.get(texture) else {
                if missing_textures.insert(texture.to_owned()) {
                    warn!(
                        "no atlas region for texture '{}' (block '{}'), skipping faces",
                        texture, block.name
                    );
                }
                continue;
            };

            self.emit_face(chunk, world, buffer, voxel, side, rect);
        }
    }

    fn emit_face(
        &self,
        chunk: &Chunk,
        world: &World,
        buffer: &mut FaceBuffer,
        voxel: Point3<i32>,
        side: BlockSide,
        rect: atlas::AtlasRect,
    ) {
        let normal = side.normal();
        let (u, v) = side.tangents();
        let origin = side.quad_origin();

        let base_x = (chunk.position().x * CHUNK_DIMENSION + voxel.x) as f32;
        let base_y = voxel.y as f32;
        let base_z = (chunk.position().y * CHUNK_DIMENSION + voxel.z) as f32;

        let normal_f = [normal.x as f32, normal.y as f32, normal.z as f32];
        let uvs = [
            [rect.u0, rect.v1],
            [rect.u1, rect.v1],
            [rect.u0, rect.v0],
            [rect.u1, rect.v0],
        ];

        let base_index = buffer.vertices.len() as u32;
        for corner in 0..4u32 {
            let on_u = corner & 1 == 1;
            let on_v = corner & 2 == 2;
            let offset = origin
                + if on_u { u } else { Vector3::new(0, 0, 0) }
                + if on_v { v } else { Vector3::new(0, 0, 0) };

            buffer.vertices.push(FaceVertex {
                position: [
                    base_x + offset.x as f32,
                    base_y + offset.y as f32,
                    base_z + offset.z as f32,
                ],
                normal: normal_f,
                uv: uvs[corner as usize],
                ao: self.corner_brightness(chunk, world, voxel + normal, u, v, on_u, on_v),
            });
        }
        buffer
            .indices
            .extend(FACE_INDICES.iter().map(|i| base_index + i));
    }

    /// Brightness of one face corner from the three diagonal voxels adjacent
    /// to it on the face's outside plane.
    fn corner_brightness(
        &self,
        chunk: &Chunk,
        world: &World,
        outside: Point3<i32>,
        u: Vector3<i32>,
        v: Vector3<i32>,
        on_u: bool,
        on_v: bool,
    ) -> f32 {
        let du = if on_u { u } else { -u };
        let dv = if on_v { v } else { -v };

        let occluders = [outside + du, outside + dv, outside + du + dv]
            .into_iter()
            .filter(|p| self.solid_beyond(chunk, world, *p))
            .count();
        1.0 - occluders as f32 / 3.0 * AO_STRENGTH
    }

    /// Reads a voxel by chunk-local coordinates that may fall outside the
    /// chunk. Vertical out-of-range is air; horizontal overflow goes through
    /// the world map, where unloaded chunks also read as air.
    fn block_beyond(&self, chunk: &Chunk, world: &World, local: Point3<i32>) -> BlockId {
        if !(0..WORLD_HEIGHT).contains(&local.y) {
            return AIR;
        }
        if (0..CHUNK_DIMENSION).contains(&local.x) && (0..CHUNK_DIMENSION).contains(&local.z) {
            return chunk.block_at(local.x, local.y, local.z);
        }
        world.get_block(
            chunk.position().x * CHUNK_DIMENSION + local.x,
            local.y,
            chunk.position().y * CHUNK_DIMENSION + local.z,
        )
    }

    fn solid_beyond(&self, chunk: &Chunk, world: &World, local: Point3<i32>) -> bool {
        if !(0..WORLD_HEIGHT).contains(&local.y) {
            return false;
        }
        if (0..CHUNK_DIMENSION).contains(&local.x) && (0..CHUNK_DIMENSION).contains(&local.z) {
            return chunk.is_block_solid(local.x, local.y, local.z);
        }
        world.is_solid(
            chunk.position().x * CHUNK_DIMENSION + local.x,
            local.y,
            chunk.position().y * CHUNK_DIMENSION + local.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::terrain::GenerationParams;
    use crate::voxels::world::WorldConfig;
    use cgmath::Point2;

    fn flat_params() -> GenerationParams {
        GenerationParams {
            seed: 42,
            height_offset: 64,
            amplitude: 0.0,
            tree_density: 0.0,
            ..GenerationParams::default()
        }
    }

    fn empty_world() -> World {
        World::new(
            Arc::new(BlockRegistry::with_defaults()),
            flat_params(),
            WorldConfig::default(),
        )
    }

    fn mesher(world: &World) -> Mesher {
        Mesher::new(
            world.registry().clone(),
            Arc::new(TextureAtlas::with_defaults()),
        )
    }

    fn set(chunk: &mut Chunk, registry: &BlockRegistry, x: i32, y: i32, z: i32, name: &str) {
        let id = registry.id_of(name).unwrap();
        chunk.set_block_at(x, y, z, id, registry.is_solid(id));
    }

    #[test]
    fn air_chunk_produces_no_faces() {
        let world = empty_world();
        let chunk = Chunk::new(Point2::new(0, 0));
        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        assert!(buffer.is_empty());
        assert_eq!(buffer.face_count(), 0);
    }

    #[test]
    fn lone_cube_emits_exactly_six_faces() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        set(&mut chunk, world.registry(), 8, 100, 8, "stone");

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        assert_eq!(buffer.face_count(), 6);
        assert_eq!(buffer.vertices.len(), 24);
        assert_eq!(buffer.indices.len(), 36);
    }

    #[test]
    fn buried_voxels_emit_nothing() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        for dz in 0..3 {
            for dy in 0..3 {
                for dx in 0..3 {
                    set(&mut chunk, world.registry(), 5 + dx, 50 + dy, 5 + dz, "stone");
                }
            }
        }

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        // Only the 3x3x3 cube's surface is visible: 9 faces per side.
        assert_eq!(buffer.face_count(), 54);
    }

    #[test]
    fn lone_cube_top_face_is_unoccluded() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        set(&mut chunk, world.registry(), 8, 100, 8, "stone");

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        for vertex in &buffer.vertices {
            assert!((0.0..=1.0).contains(&vertex.ao));
            if vertex.normal == [0.0, 1.0, 0.0] {
                assert_eq!(vertex.ao, 1.0, "nothing occludes the top face");
            }
        }
    }

    #[test]
    fn adjacent_solid_darkens_a_corner() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        set(&mut chunk, world.registry(), 8, 100, 8, "stone");
        // A block diagonally above darkens the top face corners next to it.
        set(&mut chunk, world.registry(), 9, 101, 8, "stone");

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        let top_aos: Vec<f32> = buffer
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, 1.0, 0.0] && v.position[1] == 101.0)
            .map(|v| v.ao)
            .collect();
        assert!(!top_aos.is_empty());
        assert!(top_aos.iter().any(|ao| *ao < 1.0));
        assert!(top_aos.iter().all(|ao| (0.0..=1.0).contains(ao)));
    }

    #[test]
    fn transparent_volume_has_no_internal_faces() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        set(&mut chunk, world.registry(), 8, 100, 8, "water");
        set(&mut chunk, world.registry(), 8, 101, 8, "water");

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        // Two stacked voxels share one interior boundary: 12 - 2 faces.
        assert_eq!(buffer.face_count(), 10);
    }

    #[test]
    fn solid_face_against_water_is_emitted() {
        let world = empty_world();
        let mut chunk = Chunk::new(Point2::new(0, 0));
        set(&mut chunk, world.registry(), 8, 100, 8, "stone");
        set(&mut chunk, world.registry(), 8, 101, 8, "water");

        let buffer = mesher(&world).extract_mesh(&chunk, &world);
        let stone_top_emitted = buffer
            .vertices
            .iter()
            .any(|v| v.normal == [0.0, 1.0, 0.0] && v.position[1] == 101.0);
        assert!(stone_top_emitted, "stone must be visible through water");
    }

    #[test]
    fn border_faces_cull_against_a_loaded_neighbor() {
        let mut world = empty_world();
        world.load_chunk(Point2::new(0, 0));
        world.load_chunk(Point2::new(1, 0));

        let mesher = mesher(&world);
        let handle = world.chunk_handle(Point2::new(0, 0)).unwrap();
        let buffer = mesher.extract_mesh(&handle.get(), &world);

        let east_border_faces = buffer
            .vertices
            .iter()
            .filter(|v| v.normal == [1.0, 0.0, 0.0] && v.position[0] == 16.0)
            .count();
        assert_eq!(
            east_border_faces, 0,
            "identical terrain across the border must cull all east faces"
        );
    }

    #[test]
    fn border_faces_appear_against_an_unloaded_neighbor() {
        let mut world = empty_world();
        world.load_chunk(Point2::new(0, 0));

        let mesher = mesher(&world);
        let handle = world.chunk_handle(Point2::new(0, 0)).unwrap();
        let buffer = mesher.extract_mesh(&handle.get(), &world);

        let east_border_faces = buffer
            .vertices
            .iter()
            .filter(|v| v.normal == [1.0, 0.0, 0.0] && v.position[0] == 16.0)
            .count();
        assert!(
            east_border_faces > 0,
            "an unloaded neighbor reads as air, exposing the border"
        );
    }

    #[test]
    fn missing_atlas_region_skips_the_face() {
        use crate::voxels::block::BlockProperties;

        let mut registry = BlockRegistry::new();
        let mystery = registry
            .register(BlockProperties::opaque("mystery", 1.0, "mystery"))
            .unwrap();
        let registry = Arc::new(registry);

        let world = World::new(registry.clone(), flat_params(), WorldConfig::default());
        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.set_block_at(8, 100, 8, mystery, true);

        let mesher = Mesher::new(registry, Arc::new(TextureAtlas::with_defaults()));
        let buffer = mesher.extract_mesh(&chunk, &world);
        assert!(buffer.is_empty());
    }
}
