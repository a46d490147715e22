use std::sync::OnceLock;

use crate::error::{MapError, MapResult};

// Number of transition tiles each blend atlas provides (indices 0..20)
pub const BLEND_TILE_COUNT: u8 = 20;

// (mask, tile) pairs. Masks are kept as u16 because the authored data
// contains values that do not fit a mask; those are dropped on load.
const SAND_GRASS_ENTRIES: &[(u16, u8)] = &[
    (255, 0),
    (223, 0),
    (85, 1),
    (64, 2),
    (96, 2),
    (192, 2),
    (224, 2),
    (69, 3),
    (231, 3),
    (207, 3),
    (299, 3),
    (199, 3),
    (65, 4),
    (193, 5),
    (195, 5),
    (225, 5),
    (227, 5),
    (203, 5),
    (68, 6),
    (1, 7),
    (3, 7),
    (129, 7),
    (131, 7),
    (139, 7),
    (163, 7),
    (81, 8),
    (241, 8),
    (243, 8),
    (251, 8),
    (80, 9),
    (112, 10),
    (120, 10),
    (240, 10),
    (248, 10),
    (17, 11),
    (51, 11),
    (4, 12),
    (6, 12),
    (14, 12),
    (12, 12),
    (31, 13),
    (151, 13),
    (63, 13),
    (159, 13),
    (191, 13),
    (5, 14),
    (28, 15),
    (30, 15),
    (60, 15),
    (62, 15),
    (7, 16),
    (15, 16),
    (135, 16),
    (143, 16),
    (16, 17),
    (24, 17),
    (56, 17),
    (48, 17),
    (84, 18),
    (124, 18),
    (20, 19),
];

// Same shapes as sand/grass plus a handful of extra corner cases
const DIRT_STONE_ENTRIES: &[(u16, u8)] = &[
    (255, 0),
    (223, 0),
    (85, 1),
    (64, 2),
    (96, 2),
    (192, 2),
    (224, 2),
    (104, 2),
    (69, 3),
    (231, 3),
    (207, 3),
    (299, 3),
    (199, 3),
    (65, 4),
    (193, 5),
    (195, 5),
    (225, 5),
    (227, 5),
    (203, 5),
    (97, 5),
    (68, 6),
    (198, 6),
    (236, 6),
    (1, 7),
    (3, 7),
    (11, 7),
    (129, 7),
    (131, 7),
    (139, 7),
    (163, 7),
    (81, 8),
    (241, 8),
    (243, 8),
    (249, 8),
    (251, 8),
    (80, 9),
    (112, 10),
    (120, 10),
    (240, 10),
    (248, 10),
    (17, 11),
    (51, 11),
    (4, 12),
    (6, 12),
    (14, 12),
    (12, 12),
    (31, 13),
    (151, 13),
    (63, 13),
    (159, 13),
    (191, 13),
    (5, 14),
    (28, 15),
    (30, 15),
    (60, 15),
    (62, 15),
    (7, 16),
    (15, 16),
    (135, 16),
    (143, 16),
    (16, 17),
    (24, 17),
    (56, 17),
    (48, 17),
    (84, 18),
    (116, 18),
    (124, 18),
    (252, 18),
    (20, 19),
];

// 256-entry table from neighbor mask to transition tile. Most masks have no
// dedicated art and map to NONE; the renderer then draws the plain tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendMap {
    tiles: [i8; 256],
}

impl BlendMap {
    pub const NONE: i8 = -1;

    pub fn empty() -> Self {
        Self {
            tiles: [Self::NONE; 256],
        }
    }

    // Lenient load: bad entries are skipped and logged at debug level, since
    // the built-in tables carry one known bad entry (299) and are rebuilt
    // often. Later entries for the same mask overwrite earlier ones.
    pub fn from_entries(entries: &[(u16, u8)]) -> Self {
        let mut map = Self::empty();
        for &(mask, tile) in entries {
            if let Err(err) = map.insert(mask, tile) {
                tracing::debug!("ignoring blend table entry: {}", err);
            }
        }
        map
    }

    // Strict load: the first bad entry fails the whole table
    pub fn try_from_entries(entries: &[(u16, u8)]) -> MapResult<Self> {
        let mut map = Self::empty();
        for &(mask, tile) in entries {
            map.insert(mask, tile)?;
        }
        Ok(map)
    }

    fn insert(&mut self, mask: u16, tile: u8) -> MapResult<()> {
        if mask > u8::MAX as u16 || tile >= BLEND_TILE_COUNT {
            return Err(MapError::InvalidBlendEntry { mask, tile });
        }
        self.tiles[mask as usize] = tile as i8;
        Ok(())
    }

    pub fn lookup(&self, mask: impl Into<u8>) -> Option<u8> {
        let raw = self.lookup_raw(mask);
        (raw != Self::NONE).then_some(raw as u8)
    }

    // Tile index, or NONE (-1) when the pattern has no dedicated tile
    pub fn lookup_raw(&self, mask: impl Into<u8>) -> i8 {
        self.tiles[mask.into() as usize]
    }

    // Number of masks with a dedicated tile
    pub fn len(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != Self::NONE).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BlendMap {
    fn default() -> Self {
        Self::empty()
    }
}

pub fn build_sand_grass_blend_map() -> BlendMap {
    BlendMap::from_entries(SAND_GRASS_ENTRIES)
}

pub fn build_dirt_stone_blend_map() -> BlendMap {
    BlendMap::from_entries(DIRT_STONE_ENTRIES)
}

// Process-wide tables, built on first use
pub fn sand_grass_blend_map() -> &'static BlendMap {
    static MAP: OnceLock<BlendMap> = OnceLock::new();
    MAP.get_or_init(build_sand_grass_blend_map)
}

pub fn dirt_stone_blend_map() -> &'static BlendMap {
    static MAP: OnceLock<BlendMap> = OnceLock::new();
    MAP.get_or_init(build_dirt_stone_blend_map)
}
