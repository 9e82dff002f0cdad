//! # Texture Atlas Module
//!
//! Maps texture names from the block catalog to normalized UV regions of a
//! single packed atlas image. The mesher resolves regions by name while
//! emitting faces; a missing entry causes the face to be skipped with a
//! warning rather than emitted with garbage coordinates.

use std::collections::HashMap;

/// A normalized UV rectangle within the atlas, `u0 < u1` and `v0 < v1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRect {
    /// Left edge.
    pub u0: f32,
    /// Top edge.
    pub v0: f32,
    /// Right edge.
    pub u1: f32,
    /// Bottom edge.
    pub v1: f32,
}

/// A name-to-region lookup for a packed texture atlas.
pub struct TextureAtlas {
    regions: HashMap<String, AtlasRect>,
}

/// Grid width in tiles for the built-in atlas layout.
const DEFAULT_GRID: usize = 4;

/// Tile assignments for the built-in block catalog, in row-major grid order.
const DEFAULT_TILES: &[&str] = &[
    "stone",
    "dirt",
    "grass_top",
    "grass_side",
    "sand",
    "water",
    "bedrock",
    "wood_top",
    "wood_side",
    "leaves",
    "glass",
    "coal_ore",
    "iron_ore",
    "gold_ore",
    "diamond_ore",
];

impl TextureAtlas {
    /// Creates an empty atlas.
    pub fn new() -> Self {
        TextureAtlas {
            regions: HashMap::new(),
        }
    }

    /// Builds the atlas matching the built-in block catalog: a
    /// [`DEFAULT_GRID`]-wide square grid of equally sized tiles, assigned in
    /// [`DEFAULT_TILES`] order.
    pub fn with_defaults() -> Self {
        let mut atlas = TextureAtlas::new();
        let tile = 1.0 / DEFAULT_GRID as f32;
        for (index, name) in DEFAULT_TILES.iter().enumerate() {
            let col = index % DEFAULT_GRID;
            let row = index / DEFAULT_GRID;
            atlas.insert(
                name,
                AtlasRect {
                    u0: col as f32 * tile,
                    v0: row as f32 * tile,
                    u1: (col + 1) as f32 * tile,
                    v1: (row + 1) as f32 * tile,
                },
            );
        }
        atlas
    }

    /// Registers or replaces a named region.
    pub fn insert(&mut self, name: &str, rect: AtlasRect) {
        self.regions.insert(name.to_owned(), rect);
    }

    /// Looks up the region for a texture name.
    pub fn get(&self, name: &str) -> Option<AtlasRect> {
        self.regions.get(name).copied()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        TextureAtlas::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_atlas_covers_the_block_catalog() {
        let atlas = TextureAtlas::with_defaults();
        for name in DEFAULT_TILES {
            let rect = atlas.get(name).unwrap_or_else(|| panic!("missing {}", name));
            assert!(rect.u0 < rect.u1);
            assert!(rect.v0 < rect.v1);
            assert!((0.0..=1.0).contains(&rect.u0) && (0.0..=1.0).contains(&rect.u1));
            assert!((0.0..=1.0).contains(&rect.v0) && (0.0..=1.0).contains(&rect.v1));
        }
    }

    #[test]
    fn regions_do_not_overlap() {
        let atlas = TextureAtlas::with_defaults();
        let rects: Vec<AtlasRect> = DEFAULT_TILES
            .iter()
            .map(|name| atlas.get(name).unwrap())
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let disjoint =
                    a.u1 <= b.u0 || b.u1 <= a.u0 || a.v1 <= b.v0 || b.v1 <= a.v0;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(TextureAtlas::with_defaults().get("lava").is_none());
    }
}
