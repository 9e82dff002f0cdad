//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block along with
//! the geometric data the mesher needs per face: the outward normal, the quad
//! origin corner, and the two tangent axes that span the quad.

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a fixed integer value used to index per-face
/// texture tables, so the discriminants are part of the storage contract.
/// The `FromPrimitive` derive allows conversion back from those indices.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The top face (facing positive Y)
    Top = 0,

    /// The bottom face (facing negative Y)
    Bottom = 1,

    /// The north face (facing negative Z)
    North = 2,

    /// The south face (facing positive Z)
    South = 3,

    /// The east face (facing positive X)
    East = 4,

    /// The west face (facing negative X)
    West = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in discriminant order.
    ///
    /// This is the iteration order used by the mesher and by per-face texture
    /// resolution, so it must stay in sync with the enum discriminants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Top,
            BlockSide::Bottom,
            BlockSide::North,
            BlockSide::South,
            BlockSide::East,
            BlockSide::West,
        ]
    }

    /// Returns the outward unit normal of this face in block coordinates.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::North => Vector3::new(0, 0, -1),
            BlockSide::South => Vector3::new(0, 0, 1),
            BlockSide::East => Vector3::new(1, 0, 0),
            BlockSide::West => Vector3::new(-1, 0, 0),
        }
    }

    /// Returns the corner of the unit cube where this face's quad starts.
    ///
    /// The remaining three corners are reached by adding the two tangent axes
    /// from [`BlockSide::tangents`].
    pub fn quad_origin(self) -> Vector3<i32> {
        match self {
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Bottom => Vector3::new(0, 0, 0),
            BlockSide::North => Vector3::new(1, 0, 0),
            BlockSide::South => Vector3::new(0, 0, 1),
            BlockSide::East => Vector3::new(1, 0, 1),
            BlockSide::West => Vector3::new(0, 0, 0),
        }
    }

    /// Returns the two tangent axes `(u, v)` spanning this face's quad.
    ///
    /// The axes are chosen so that `u x v` equals the face normal, which gives
    /// every emitted quad a counter-clockwise winding when viewed from outside
    /// the block.
    pub fn tangents(self) -> (Vector3<i32>, Vector3<i32>) {
        match self {
            BlockSide::Top => (Vector3::new(0, 0, 1), Vector3::new(1, 0, 0)),
            BlockSide::Bottom => (Vector3::new(1, 0, 0), Vector3::new(0, 0, 1)),
            BlockSide::North => (Vector3::new(-1, 0, 0), Vector3::new(0, 1, 0)),
            BlockSide::South => (Vector3::new(1, 0, 0), Vector3::new(0, 1, 0)),
            BlockSide::East => (Vector3::new(0, 0, -1), Vector3::new(0, 1, 0)),
            BlockSide::West => (Vector3::new(0, 0, 1), Vector3::new(0, 1, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangent_cross_products_match_normals() {
        for side in BlockSide::all() {
            let (u, v) = side.tangents();
            let cross = Vector3::new(
                u.y * v.z - u.z * v.y,
                u.z * v.x - u.x * v.z,
                u.x * v.y - u.y * v.x,
            );
            assert_eq!(cross, side.normal(), "winding broken for {:?}", side);
        }
    }

    #[test]
    fn quad_corners_lie_on_unit_cube() {
        for side in BlockSide::all() {
            let base = side.quad_origin();
            let (u, v) = side.tangents();
            for corner in [base, base + u, base + v, base + u + v] {
                for component in [corner.x, corner.y, corner.z] {
                    assert!((0..=1).contains(&component));
                }
            }
        }
    }

    #[test]
    fn discriminants_round_trip_through_from_primitive() {
        for side in BlockSide::all() {
            let restored: Option<BlockSide> = num::FromPrimitive::from_u8(side as u8);
            assert_eq!(restored, Some(side));
        }
    }
}
