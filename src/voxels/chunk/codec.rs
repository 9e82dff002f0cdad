//! # Chunk Codec Module
//!
//! Run-length encoding of a chunk's flat voxel array for persistence.
//!
//! Chunk columns are dominated by long vertical runs (air above the surface,
//! stone below it), so run-length pairs compress them by orders of magnitude
//! in the common case. The worst case — no repeated runs at all — encodes to
//! one pair per voxel and is accepted, not rejected: correctness over size.
//!
//! Decoding is defensive: a malformed stream yields a [`CodecError`] and the
//! caller treats the chunk as never generated, regenerating it from the world
//! seed instead of crashing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::super::block::BlockId;
use super::{Chunk, CHUNK_VOLUME};

/// A single run of identical voxels in the flat array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRun {
    /// The repeated block id.
    pub value: BlockId,
    /// How many consecutive voxels hold it. Never zero in a valid stream.
    pub length: u32,
}

/// Errors produced while decoding a run-length stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A run with length zero was encountered.
    #[error("zero-length run at index {0}")]
    EmptyRun(usize),

    /// The stream's total length does not match the expected voxel count.
    #[error("run lengths total {actual} voxels, expected {expected}")]
    LengthMismatch {
        /// The voxel count the caller expected to reconstruct.
        expected: usize,
        /// The voxel count the stream actually described.
        actual: usize,
    },
}

/// Run-length encodes a flat voxel array.
pub fn encode(voxels: &[BlockId]) -> Vec<BlockRun> {
    let mut runs = Vec::new();
    let mut iter = voxels.iter();

    let Some(&first) = iter.next() else {
        return runs;
    };
    let mut current = BlockRun {
        value: first,
        length: 1,
    };

    for &id in iter {
        if id == current.value {
            current.length += 1;
        } else {
            runs.push(current);
            current = BlockRun {
                value: id,
                length: 1,
            };
        }
    }
    runs.push(current);
    runs
}

/// Run-length encodes a chunk's voxel array.
pub fn encode_chunk(chunk: &Chunk) -> Vec<BlockRun> {
    encode(chunk.voxels())
}

/// Reconstructs a flat voxel array of `expected_len` voxels from a run-length
/// stream.
///
/// # Errors
/// Returns [`CodecError`] if any run is empty or the totals do not match;
/// nothing is partially applied.
pub fn decode(runs: &[BlockRun], expected_len: usize) -> Result<Vec<BlockId>, CodecError> {
    let mut total: usize = 0;
    for (index, run) in runs.iter().enumerate() {
        if run.length == 0 {
            return Err(CodecError::EmptyRun(index));
        }
        total = total.saturating_add(run.length as usize);
        if total > expected_len {
            return Err(CodecError::LengthMismatch {
                expected: expected_len,
                actual: total,
            });
        }
    }
    if total != expected_len {
        return Err(CodecError::LengthMismatch {
            expected: expected_len,
            actual: total,
        });
    }

    let mut voxels = Vec::with_capacity(expected_len);
    for run in runs {
        voxels.extend(std::iter::repeat(run.value).take(run.length as usize));
    }
    Ok(voxels)
}

/// Reconstructs a full chunk voxel array from a run-length stream.
pub fn decode_chunk(runs: &[BlockRun]) -> Result<Vec<BlockId>, CodecError> {
    decode(runs, CHUNK_VOLUME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_mixed_array() {
        let voxels: Vec<BlockId> = vec![0, 0, 0, 1, 1, 2, 0, 0, 3, 3, 3, 3];
        let runs = encode(&voxels);
        assert_eq!(runs.len(), 5);
        assert_eq!(decode(&runs, voxels.len()).unwrap(), voxels);
    }

    #[test]
    fn round_trip_all_identical_is_one_run() {
        let voxels = vec![7 as BlockId; 4096];
        let runs = encode(&voxels);
        assert_eq!(
            runs,
            vec![BlockRun {
                value: 7,
                length: 4096
            }]
        );
        assert_eq!(decode(&runs, voxels.len()).unwrap(), voxels);
    }

    #[test]
    fn round_trip_all_distinct_worst_case() {
        let voxels: Vec<BlockId> = (0..1024).map(|i| i as BlockId).collect();
        let runs = encode(&voxels);
        assert_eq!(runs.len(), voxels.len(), "worst case is one run per voxel");
        assert_eq!(decode(&runs, voxels.len()).unwrap(), voxels);
    }

    #[test]
    fn empty_array_encodes_to_nothing() {
        let runs = encode(&[]);
        assert!(runs.is_empty());
        assert_eq!(decode(&runs, 0).unwrap(), Vec::<BlockId>::new());
    }

    #[test]
    fn zero_length_run_is_corruption() {
        let runs = vec![
            BlockRun {
                value: 1,
                length: 4,
            },
            BlockRun {
                value: 2,
                length: 0,
            },
        ];
        assert_eq!(decode(&runs, 4), Err(CodecError::EmptyRun(1)));
    }

    #[test]
    fn short_stream_is_corruption() {
        let runs = vec![BlockRun {
            value: 1,
            length: 3,
        }];
        assert_eq!(
            decode(&runs, 8),
            Err(CodecError::LengthMismatch {
                expected: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn overlong_stream_is_corruption() {
        let runs = vec![BlockRun {
            value: 1,
            length: 9,
        }];
        assert!(matches!(
            decode(&runs, 8),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn chunk_round_trip() {
        use crate::voxels::block::registry::BlockRegistry;
        use crate::voxels::block::BlockProperties;
        use cgmath::Point2;

        let mut registry = BlockRegistry::new();
        let stone = registry
            .register(BlockProperties::opaque("stone", 1.5, "stone"))
            .unwrap();

        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.set_block_at(0, 0, 0, stone, true);
        chunk.set_block_at(8, 100, 8, stone, true);
        chunk.set_block_at(15, 255, 15, stone, true);

        let runs = encode_chunk(&chunk);
        let decoded = decode_chunk(&runs).unwrap();
        assert_eq!(decoded.as_slice(), chunk.voxels());
    }
}
