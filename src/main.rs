//! # Voxel World Demo Entry Point
//!
//! A headless demonstration of the engine: streams terrain around a moving
//! center, performs a few block edits and a raycast, then snapshots the world
//! to JSON and reports what was built.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::info;

use voxel_world::engine::WorldEngine;
use voxel_world::meshing::{atlas::TextureAtlas, Mesher};
use voxel_world::voxels::block::registry::BlockRegistry;
use voxel_world::voxels::persistence::WorldSave;
use voxel_world::voxels::terrain::GenerationParams;
use voxel_world::voxels::world::{World, WorldConfig};

const TICKS: usize = 600;
const WALK_SPEED: f32 = 0.8;

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let registry = Arc::new(BlockRegistry::with_defaults());
    let params = GenerationParams {
        seed: 42,
        ..GenerationParams::default()
    };
    let world = World::new(registry.clone(), params, WorldConfig::default());
    let mesher = Mesher::new(registry.clone(), Arc::new(TextureAtlas::with_defaults()));

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let mut engine = WorldEngine::new(world, mesher, workers);

    // Walk east while the engine streams chunks in and out around us.
    let mut center = Point3::new(0.0, 80.0, 0.0);
    for tick in 0..TICKS {
        engine.update(center);
        center.x += WALK_SPEED;

        if tick % 100 == 0 {
            let world = engine.world().get();
            info!(
                "tick {}: {} chunks loaded, {} meshes, {} generations pending",
                tick,
                world.loaded_chunk_count(),
                engine.meshes().len(),
                engine.pending_generation_count()
            );
        }
    }

    // Let in-flight work land before poking at the world.
    while !engine.is_idle() {
        engine.update(center);
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    {
        let mut world = engine.world().get_mut();
        if let Some(hit) = world.raycast(center, Vector3::new(0.0, -1.0, 0.0), 100.0) {
            let name = world.registry().get(hit.id).name.clone();
            info!(
                "ground below {:?}: '{}' at {:?}, {:.1} blocks down",
                center, name, hit.block, hit.distance
            );
            let glass = world.registry().id_of("glass");
            if let Some(glass) = glass {
                world.set_block(hit.block.x, hit.block.y + 1, hit.block.z, glass);
                info!("placed glass on the surface at {:?}", hit.block);
            }
        } else {
            info!("no ground within 100 blocks below {:?}", center);
        }
    }
    engine.update(center);

    let faces: usize = engine.meshes().values().map(|mesh| mesh.face_count()).sum();
    info!(
        "final state: {} meshes totalling {} faces",
        engine.meshes().len(),
        faces
    );

    match WorldSave::capture(&engine.world().get()).to_json() {
        Ok(json) => info!("world snapshot: {} bytes of JSON", json.len()),
        Err(error) => log::error!("failed to serialize world snapshot: {}", error),
    };
}
