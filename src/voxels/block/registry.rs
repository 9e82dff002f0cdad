//! # Block Registry Module
//!
//! The registry is the static catalog of block types: it assigns ids, resolves
//! per-face textures once at registration, and answers id/name lookups for the
//! rest of the engine.
//!
//! ## Lookup Semantics
//!
//! Unknown ids resolve to the air block type rather than erroring, because
//! world-edge and malformed-save lookups happen constantly and must not take
//! down meshing or physics. The registry is built once at world construction
//! and is read-only afterwards, so it is shared across worker threads as a
//! plain `Arc<BlockRegistry>` without locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use thiserror::Error;

use super::block_side::BlockSide;
use super::{BlockId, BlockProperties, BlockType, FaceTextures, AIR};

/// Errors produced by block registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An explicit id was requested that is already occupied.
    #[error("block id {0} is already registered")]
    DuplicateId(BlockId),

    /// The id space of [`BlockId`] has been exhausted.
    #[error("block id space exhausted")]
    IdSpaceExhausted,
}

/// The catalog of block types, looked up by id or name.
///
/// Construct with [`BlockRegistry::with_defaults`] for the built-in catalog,
/// or [`BlockRegistry::new`] for an empty registry containing only air.
pub struct BlockRegistry {
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
    unknown_id_warned: AtomicBool,
}

impl BlockRegistry {
    /// Creates a registry containing only the reserved air block at id 0.
    pub fn new() -> Self {
        let air = BlockType {
            id: AIR,
            name: "air".to_owned(),
            solid: false,
            transparent: true,
            hardness: 0.0,
            luminance: 0,
            textures: BlockSide::all().map(|_| String::new()),
            drops: Vec::new(),
        };
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), AIR);

        BlockRegistry {
            blocks: vec![Some(air)],
            by_name,
            unknown_id_warned: AtomicBool::new(false),
        }
    }

    /// Registers a block type under the next free id and returns that id.
    ///
    /// # Errors
    /// Returns [`RegistryError::IdSpaceExhausted`] if no more ids fit in
    /// [`BlockId`].
    pub fn register(&mut self, properties: BlockProperties) -> Result<BlockId, RegistryError> {
        if self.blocks.len() > BlockId::MAX as usize {
            return Err(RegistryError::IdSpaceExhausted);
        }
        let id = self.blocks.len() as BlockId;
        self.install(id, properties);
        Ok(id)
    }

    /// Registers a block type under an explicit id.
    ///
    /// If the id is already taken, the later registration wins and a warning
    /// is logged. Callers needing stricter behavior should use
    /// [`BlockRegistry::try_register_with_id`].
    pub fn register_with_id(&mut self, id: BlockId, properties: BlockProperties) -> BlockId {
        if self.is_registered(id) {
            warn!(
                "block id {} re-registered as '{}', overwriting previous entry",
                id, properties.name
            );
        }
        self.install(id, properties);
        id
    }

    /// Registers a block type under an explicit id, rejecting duplicates.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateId`] if the id is already occupied.
    pub fn try_register_with_id(
        &mut self,
        id: BlockId,
        properties: BlockProperties,
    ) -> Result<BlockId, RegistryError> {
        if self.is_registered(id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.install(id, properties);
        Ok(id)
    }

    fn install(&mut self, id: BlockId, properties: BlockProperties) {
        let slot = id as usize;
        if slot >= self.blocks.len() {
            self.blocks.resize(slot + 1, None);
        }
        if let Some(previous) = self.blocks[slot].take() {
            self.by_name.remove(&previous.name);
        }
        let block = BlockType::from_properties(id, &properties);
        self.by_name.insert(block.name.clone(), id);
        self.blocks[slot] = Some(block);
    }

    fn is_registered(&self, id: BlockId) -> bool {
        matches!(self.blocks.get(id as usize), Some(Some(_)))
    }

    /// Looks up a block type by id. Never fails: unknown ids resolve to the
    /// air block type, with a warning logged the first time it happens.
    pub fn get(&self, id: BlockId) -> &BlockType {
        match self.blocks.get(id as usize).and_then(Option::as_ref) {
            Some(block) => block,
            None => {
                if !self.unknown_id_warned.swap(true, Ordering::Relaxed) {
                    warn!("unknown block id {} resolved to air", id);
                }
                self.blocks[AIR as usize]
                    .as_ref()
                    .expect("air is always registered")
            }
        }
    }

    /// Looks up a block type by name.
    pub fn get_by_name(&self, name: &str) -> Option<&BlockType> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    /// Returns the id registered under the given name, if any.
    pub fn id_of(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Returns true if the id refers to a solid block.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).solid
    }

    /// Returns true if the id refers to a transparent block (air included).
    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.get(id).transparent
    }

    /// Number of registered block types, air included.
    pub fn len(&self) -> usize {
        self.blocks.iter().flatten().count()
    }

    /// Returns true if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Builds the registry with the built-in block catalog.
    ///
    /// Registration order fixes the ids, so saves created with this catalog
    /// decode against it; everything else in the engine resolves blocks by
    /// name at startup instead of hard-coding ids.
    pub fn with_defaults() -> Self {
        let mut registry = BlockRegistry::new();

        let catalog_error = "built-in catalog exceeds the block id space";

        registry
            .register(BlockProperties::opaque("stone", 1.5, "stone"))
            .expect(catalog_error);
        let dirt = registry
            .register(BlockProperties::opaque("dirt", 0.5, "dirt"))
            .expect(catalog_error);

        let mut grass_faces = HashMap::new();
        grass_faces.insert(BlockSide::Top, "grass_top".to_owned());
        grass_faces.insert(BlockSide::Bottom, "dirt".to_owned());
        registry
            .register(BlockProperties {
                name: "grass".to_owned(),
                solid: true,
                transparent: false,
                hardness: 0.6,
                luminance: 0,
                textures: FaceTextures::PerFace {
                    faces: grass_faces,
                    fallback: "grass_side".to_owned(),
                },
                drops: vec![dirt],
            })
            .expect(catalog_error);

        registry
            .register(BlockProperties::opaque("sand", 0.5, "sand"))
            .expect(catalog_error);
        registry
            .register(BlockProperties {
                name: "water".to_owned(),
                solid: false,
                transparent: true,
                hardness: 100.0,
                luminance: 0,
                textures: FaceTextures::uniform("water"),
                drops: Vec::new(),
            })
            .expect(catalog_error);
        registry
            .register(BlockProperties {
                name: "bedrock".to_owned(),
                solid: true,
                transparent: false,
                hardness: -1.0,
                luminance: 0,
                textures: FaceTextures::uniform("bedrock"),
                drops: Vec::new(),
            })
            .expect(catalog_error);

        let mut wood_faces = HashMap::new();
        wood_faces.insert(BlockSide::Top, "wood_top".to_owned());
        wood_faces.insert(BlockSide::Bottom, "wood_top".to_owned());
        registry
            .register(BlockProperties {
                name: "wood".to_owned(),
                solid: true,
                transparent: false,
                hardness: 2.0,
                luminance: 0,
                textures: FaceTextures::PerFace {
                    faces: wood_faces,
                    fallback: "wood_side".to_owned(),
                },
                drops: Vec::new(),
            })
            .expect(catalog_error);
        registry
            .register(BlockProperties {
                name: "leaves".to_owned(),
                solid: true,
                transparent: true,
                hardness: 0.2,
                luminance: 0,
                textures: FaceTextures::uniform("leaves"),
                drops: Vec::new(),
            })
            .expect(catalog_error);
        registry
            .register(BlockProperties {
                name: "glass".to_owned(),
                solid: true,
                transparent: true,
                hardness: 0.3,
                luminance: 0,
                textures: FaceTextures::uniform("glass"),
                drops: Vec::new(),
            })
            .expect(catalog_error);

        registry
            .register(BlockProperties::opaque("coal_ore", 3.0, "coal_ore"))
            .expect(catalog_error);
        registry
            .register(BlockProperties::opaque("iron_ore", 3.0, "iron_ore"))
            .expect(catalog_error);
        registry
            .register(BlockProperties::opaque("gold_ore", 3.0, "gold_ore"))
            .expect(catalog_error);
        registry
            .register(BlockProperties::opaque("diamond_ore", 3.0, "diamond_ore"))
            .expect(catalog_error);

        registry
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        BlockRegistry::new()
    }
}
