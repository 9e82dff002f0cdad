//! # Persistence Module
//!
//! Serialization boundary for world state. A save captures the generation
//! parameters (seed included) plus the run-length encoded contents of every
//! loaded chunk; everything else regenerates deterministically from the seed
//! on load, so unvisited chunks cost nothing to persist.
//!
//! The format is JSON for inspectability. Corrupt chunk records degrade to
//! regeneration with a warning rather than failing the whole load.

use cgmath::Point2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chunk::codec::{self, BlockRun};
use super::terrain::GenerationParams;
use super::world::World;

/// Errors produced while reading a serialized world.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save document itself could not be parsed.
    #[error("malformed save document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One persisted chunk: its chunk coordinates and encoded contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk coordinates as `[x, z]`.
    pub coord: [i32; 2],
    /// Run-length encoded voxel contents.
    pub runs: Vec<BlockRun>,
}

/// A complete serialized world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    /// The generation parameters, so ungenerated chunks reload identically.
    pub params: GenerationParams,
    /// Every chunk that was loaded when the snapshot was taken.
    pub chunks: Vec<ChunkRecord>,
}

impl WorldSave {
    /// Captures a snapshot of every loaded chunk in the world.
    pub fn capture(world: &World) -> Self {
        let mut coords: Vec<Point2<i32>> = world.loaded_chunk_coords().collect();
        coords.sort_by_key(|coord| (coord.x, coord.y));

        let chunks = coords
            .into_iter()
            .filter_map(|coord| {
                let handle = world.chunk_handle(coord)?;
                let chunk = handle.get();
                if !chunk.is_generated() {
                    return None;
                }
                Some(ChunkRecord {
                    coord: [coord.x, coord.y],
                    runs: codec::encode_chunk(&chunk),
                })
            })
            .collect();

        WorldSave {
            params: world.generator().params().clone(),
            chunks,
        }
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    /// Returns [`SaveError::Malformed`] if the document does not parse;
    /// per-chunk corruption is handled later, during [`WorldSave::restore`].
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Restores every chunk in the snapshot into the world. Chunks whose
    /// streams fail to decode are regenerated from the seed.
    ///
    /// The caller is responsible for constructing the world with the
    /// snapshot's [`WorldSave::params`]; restoring into a world built from
    /// different parameters would regenerate corrupt chunks inconsistently.
    pub fn restore(&self, world: &mut World) {
        for record in &self.chunks {
            let coord = Point2::new(record.coord[0], record.coord[1]);
            world.restore_chunk(coord, &record.runs);
        }
    }
}
