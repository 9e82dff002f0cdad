//! # Engine Module
//!
//! The per-frame driver that ties the world, the worker pool and the mesher
//! together. Each [`WorldEngine::update`] call, on the main thread:
//!
//! 1. Drains completed worker results, committing generated chunk contents
//!    and accepting finished meshes.
//! 2. Streams chunks around the center: distant chunks unload, missing
//!    chunks load and get generation tasks published.
//! 3. Drains the world's dirty set and publishes mesh extraction tasks.
//! 4. Flushes queued tasks onto freed workers.
//!
//! ## Cancellation and Staleness
//!
//! Workers are never interrupted. Work for a chunk that unloads mid-flight
//! completes normally and its result is discarded on arrival. A mesh built
//! from contents that were edited while it was in flight fails its revision
//! check on arrival; the chunk is re-marked dirty so a fresh mesh gets
//! scheduled, and edits are never silently dropped.
//!
//! ## Lock Ordering
//!
//! Both the main thread and mesh workers acquire the world lock before any
//! chunk lock, never the reverse, which rules out lock-order inversion
//! between a worker extracting a mesh and the main thread committing writes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cgmath::{Point2, Point3};
use log::debug;

use crate::core::MtResource;
use crate::meshing::vertex::FaceBuffer;
use crate::meshing::Mesher;
use crate::task_management::TaskManager;
use crate::voxels::block::BlockId;
use crate::voxels::world::World;

/// The result of one background task.
pub enum TaskOutcome {
    /// A chunk's terrain was generated off-thread.
    Generated {
        /// Chunk coordinates the contents belong to.
        coord: Point2<i32>,
        /// The generated voxel contents, ready to commit.
        voxels: Vec<BlockId>,
    },
    /// A chunk's mesh was extracted off-thread.
    Meshed {
        /// Chunk coordinates the mesh belongs to.
        coord: Point2<i32>,
        /// The chunk revision the mesh was extracted from.
        revision: u64,
        /// The extracted face buffer.
        buffer: FaceBuffer,
    },
}

/// Drives chunk streaming, background generation and meshing around a moving
/// center.
pub struct WorldEngine {
    world: MtResource<World>,
    mesher: Arc<Mesher>,
    tasks: TaskManager<TaskOutcome>,
    /// The latest accepted mesh per loaded chunk.
    meshes: HashMap<Point2<i32>, FaceBuffer>,
    /// Chunks whose generation task has been published but not yet committed.
    pending_generation: HashSet<Point2<i32>>,
    /// Chunks with a mesh extraction task in flight.
    in_flight_meshes: HashSet<Point2<i32>>,
}

impl WorldEngine {
    /// Creates an engine over a world and mesher with `num_workers` worker
    /// threads.
    pub fn new(world: World, mesher: Mesher, num_workers: usize) -> Self {
        WorldEngine {
            world: MtResource::new(world),
            mesher: Arc::new(mesher),
            tasks: TaskManager::new(num_workers),
            meshes: HashMap::new(),
            pending_generation: HashSet::new(),
            in_flight_meshes: HashSet::new(),
        }
    }

    /// Shared handle to the world, for edits and queries from the caller.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    /// The accepted meshes, keyed by chunk coordinates.
    pub fn meshes(&self) -> &HashMap<Point2<i32>, FaceBuffer> {
        &self.meshes
    }

    /// The accepted mesh for one chunk, if any.
    pub fn mesh_for(&self, coord: Point2<i32>) -> Option<&FaceBuffer> {
        self.meshes.get(&coord)
    }

    /// Chunks whose generation has been scheduled but not yet committed.
    pub fn pending_generation_count(&self) -> usize {
        self.pending_generation.len()
    }

    /// True when no background work is scheduled, queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.pending_generation.is_empty()
            && self.in_flight_meshes.is_empty()
            && self.tasks.tasks_in_flight() == 0
            && self.tasks.queued_task_count() == 0
    }

    /// Runs one frame of engine work around a world-space center position.
    pub fn update(&mut self, center: Point3<f32>) {
        let center_chunk =
            World::chunk_coord_of(center.x.floor() as i32, center.z.floor() as i32);

        self.apply_completed_outcomes();
        self.stream_chunks(center_chunk);
        self.schedule_mesh_tasks();
        self.tasks.process_queued_tasks();
    }

    fn apply_completed_outcomes(&mut self) {
        for outcome in self.tasks.drain_completed_tasks() {
            match outcome {
                TaskOutcome::Generated { coord, voxels } => {
                    self.pending_generation.remove(&coord);
                    if !self.world.get_mut().commit_generated(coord, voxels) {
                        debug!(
                            "generated contents for chunk ({}, {}) discarded",
                            coord.x, coord.y
                        );
                    }
                }
                TaskOutcome::Meshed {
                    coord,
                    revision,
                    buffer,
                } => {
                    self.in_flight_meshes.remove(&coord);
                    let mut world = self.world.get_mut();
                    match world.chunk_handle(coord) {
                        Some(handle) => {
                            let current = handle.get_mut().acknowledge_mesh(revision);
                            // A stale mesh still replaces whatever is older,
                            // but the chunk stays dirty so a fresh one follows.
                            self.meshes.insert(coord, buffer);
                            if !current {
                                world.mark_dirty(coord);
                            }
                        }
                        None => {
                            // Unloaded while the mesh was in flight.
                            self.meshes.remove(&coord);
                        }
                    }
                }
            }
        }
    }

    fn stream_chunks(&mut self, center: Point2<i32>) {
        let mut world = self.world.get_mut();
        let load_radius = world.config().load_radius;
        let unload_radius = world.config().unload_radius;

        let to_unload: Vec<Point2<i32>> = world
            .loaded_chunk_coords()
            .filter(|coord| {
                let dx = (coord.x - center.x).abs();
                let dz = (coord.y - center.y).abs();
                dx.max(dz) > unload_radius
            })
            .collect();
        for coord in to_unload {
            world.unload_chunk(coord);
            self.meshes.remove(&coord);
            self.pending_generation.remove(&coord);
        }

        for dz in -load_radius..=load_radius {
            for dx in -load_radius..=load_radius {
                let coord = Point2::new(center.x + dx, center.y + dz);
                if world.is_chunk_loaded(coord) {
                    continue;
                }
                if world.load_chunk_deferred(coord) {
                    self.pending_generation.insert(coord);
                    let generator = world.generator().clone();
                    self.tasks.publish_task(Box::new(move || {
                        TaskOutcome::Generated {
                            coord,
                            voxels: generator.generate_voxels(coord),
                        }
                    }));
                }
            }
        }
    }

    fn schedule_mesh_tasks(&mut self) {
        let dirty = self.world.get_mut().drain_dirty_chunks();
        for coord in dirty {
            if self.in_flight_meshes.contains(&coord) {
                // The in-flight mesh either already sees the new contents or
                // will fail its revision check and trigger a reschedule.
                continue;
            }
            let Some(handle) = self.world.get().chunk_handle(coord) else {
                continue;
            };
            if !handle.get().is_generated() {
                // Committing generation will dirty it again.
                continue;
            }

            self.in_flight_meshes.insert(coord);
            let world = self.world.clone();
            let mesher = self.mesher.clone();
            self.tasks.publish_task(Box::new(move || {
                // World before chunk, same order as the main thread.
                let world = world.get();
                let chunk = handle.get();
                let revision = chunk.revision();
                let buffer = mesher.extract_mesh(&chunk, &world);
                TaskOutcome::Meshed {
                    coord,
                    revision,
                    buffer,
                }
            }));
        }
    }
}
