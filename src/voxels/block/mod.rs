//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel
//! engine: block identifiers, block type records, per-face texture resolution,
//! and the block registry.
//!
//! Blocks are stored in chunks as bare [`BlockId`] values; everything else
//! about a block (solidity, transparency, hardness, textures, drops) lives in
//! the [`registry::BlockRegistry`] and is looked up on demand.

use std::collections::HashMap;

use block_side::BlockSide;

pub mod block_side;
pub mod registry;

/// The integer type used to represent block types in chunk storage.
///
/// Ids index into the [`registry::BlockRegistry`]; `u16` keeps chunk arrays
/// compact while leaving room for modded catalogs.
pub type BlockId = u16;

/// The reserved id for air / empty space. Always resolvable, never solid.
pub const AIR: BlockId = 0;

/// Maximum luminance value a block may emit (torch-light scale).
pub const MAX_LUMINANCE: u8 = 15;

/// Per-face texture assignment supplied at registration time.
///
/// Texture names are resolved into a fixed `[String; 6]` indexed by
/// [`BlockSide`] when the block is registered, so no string-keyed lookups
/// happen during meshing.
#[derive(Debug, Clone)]
pub enum FaceTextures {
    /// One texture used for all six faces.
    Uniform(String),

    /// Explicit per-face textures with a fallback for unlisted faces.
    PerFace {
        /// Face-specific texture names.
        faces: HashMap<BlockSide, String>,
        /// Texture used for any face not present in `faces`.
        fallback: String,
    },
}

impl FaceTextures {
    /// Creates a uniform assignment from any string-ish name.
    pub fn uniform(name: &str) -> Self {
        FaceTextures::Uniform(name.to_owned())
    }

    /// Resolves this assignment into the fixed per-face array used by
    /// [`BlockType`], indexed by `BlockSide` discriminants.
    fn resolve(&self) -> [String; 6] {
        BlockSide::all().map(|side| match self {
            FaceTextures::Uniform(name) => name.clone(),
            FaceTextures::PerFace { faces, fallback } => {
                faces.get(&side).unwrap_or(fallback).clone()
            }
        })
    }
}

/// The registration-time description of a block type.
///
/// This is the mutable "builder" form; the registry turns it into an immutable
/// [`BlockType`] with an assigned id and resolved face textures.
#[derive(Debug, Clone)]
pub struct BlockProperties {
    /// Unique human-readable name, used for name lookups and save files.
    pub name: String,
    /// Whether the block occludes neighbors and blocks movement.
    pub solid: bool,
    /// Whether faces behind this block should still be emitted.
    pub transparent: bool,
    /// Mining hardness; negative means indestructible.
    pub hardness: f32,
    /// Emitted light level in `0..=15`.
    pub luminance: u8,
    /// Texture assignment, resolved per face at registration.
    pub textures: FaceTextures,
    /// Block ids dropped when this block is broken.
    pub drops: Vec<BlockId>,
}

impl BlockProperties {
    /// Convenience constructor for an ordinary opaque cube with one texture
    /// on all faces and no special drops.
    pub fn opaque(name: &str, hardness: f32, texture: &str) -> Self {
        BlockProperties {
            name: name.to_owned(),
            solid: true,
            transparent: false,
            hardness,
            luminance: 0,
            textures: FaceTextures::uniform(texture),
            drops: Vec::new(),
        }
    }
}

/// An immutable block type record held by the registry.
///
/// Constructed once at registration and never mutated afterwards, so it can be
/// shared freely across worker threads without locking.
#[derive(Debug, Clone)]
pub struct BlockType {
    /// The id this block type was registered under.
    pub id: BlockId,
    /// Unique human-readable name.
    pub name: String,
    /// Whether the block occludes neighbors and blocks movement.
    pub solid: bool,
    /// Whether faces behind this block should still be emitted.
    pub transparent: bool,
    /// Mining hardness; negative means indestructible.
    pub hardness: f32,
    /// Emitted light level in `0..=15`.
    pub luminance: u8,
    /// Resolved texture name per face, indexed by [`BlockSide`].
    pub textures: [String; 6],
    /// Block ids dropped when this block is broken.
    pub drops: Vec<BlockId>,
}

impl BlockType {
    fn from_properties(id: BlockId, properties: &BlockProperties) -> Self {
        BlockType {
            id,
            name: properties.name.clone(),
            solid: properties.solid,
            transparent: properties.transparent,
            hardness: properties.hardness,
            luminance: properties.luminance.min(MAX_LUMINANCE),
            textures: properties.textures.resolve(),
            drops: properties.drops.clone(),
        }
    }

    /// Returns the texture name used by the given face.
    pub fn texture_for(&self, side: BlockSide) -> &str {
        &self.textures[side as usize]
    }

    /// Returns true if this block can never be broken.
    pub fn is_indestructible(&self) -> bool {
        self.hardness < 0.0
    }
}
