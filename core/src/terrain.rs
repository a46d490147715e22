use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::grid::Grid;

// Height thresholds, compared with strict `<` in ascending order
pub const DEEP_WATER_THRESHOLD: f32 = 0.30;
pub const WATER_THRESHOLD: f32 = 0.40;
pub const SAND_THRESHOLD: f32 = 0.45;
pub const GRASS_THRESHOLD: f32 = 0.75;
// Still grass; kept as its own band so mountains can be tuned separately
pub const MOUNTAIN_BASE_THRESHOLD: f32 = 0.78;
pub const MOUNTAIN_THRESHOLD: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TerrainType {
    DeepWater = 0,
    Water = 1,
    Sand = 2,
    Grass = 3,
    Forest = 4,
    Mountain = 5,
    Snow = 6,
}

pub type TerrainGrid = Grid<TerrainType>;

impl TerrainType {
    pub const ALL: [TerrainType; 7] = [
        TerrainType::DeepWater,
        TerrainType::Water,
        TerrainType::Sand,
        TerrainType::Grass,
        TerrainType::Forest,
        TerrainType::Mountain,
        TerrainType::Snow,
    ];

    // Base classification, first band that contains the height wins
    pub fn from_height(height: f32) -> Self {
        if height < DEEP_WATER_THRESHOLD {
            TerrainType::DeepWater
        } else if height < WATER_THRESHOLD {
            TerrainType::Water
        } else if height < SAND_THRESHOLD {
            TerrainType::Sand
        } else if height < GRASS_THRESHOLD {
            TerrainType::Grass
        } else if height < MOUNTAIN_BASE_THRESHOLD {
            TerrainType::Grass
        } else if height < MOUNTAIN_THRESHOLD {
            TerrainType::Mountain
        } else {
            TerrainType::Snow
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> MapResult<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(MapError::UnknownTerrainCode(code))
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainType::DeepWater => "DEEP_WATER",
            TerrainType::Water => "WATER",
            TerrainType::Sand => "SAND",
            TerrainType::Grass => "GRASS",
            TerrainType::Forest => "FOREST",
            TerrainType::Mountain => "MOUNTAIN",
            TerrainType::Snow => "SNOW",
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::DeepWater | TerrainType::Water)
    }

    // Grass-textured ground, forest included
    pub fn is_grassland(self) -> bool {
        matches!(self, TerrainType::Grass | TerrainType::Forest)
    }

    pub fn is_rock(self) -> bool {
        matches!(self, TerrainType::Mountain | TerrainType::Snow)
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TerrainGrid {
    pub fn to_codes(&self) -> Vec<u8> {
        self.as_slice().iter().map(|t| t.code()).collect()
    }

    pub fn from_codes(width: usize, height: usize, codes: &[u8]) -> MapResult<Self> {
        let cells = codes
            .iter()
            .map(|&c| TerrainType::from_code(c))
            .collect::<MapResult<Vec<_>>>()?;
        Grid::from_vec(width, height, cells)
    }

    pub fn count(&self, terrain: TerrainType) -> usize {
        self.as_slice().iter().filter(|&&t| t == terrain).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_bands() {
        assert_eq!(TerrainType::from_height(0.0), TerrainType::DeepWater);
        assert_eq!(TerrainType::from_height(0.2999), TerrainType::DeepWater);
        assert_eq!(TerrainType::from_height(0.30), TerrainType::Water);
        assert_eq!(TerrainType::from_height(0.40), TerrainType::Sand);
        assert_eq!(TerrainType::from_height(0.45), TerrainType::Grass);
        assert_eq!(TerrainType::from_height(0.76), TerrainType::Grass);
        assert_eq!(TerrainType::from_height(0.78), TerrainType::Mountain);
        assert_eq!(TerrainType::from_height(0.95), TerrainType::Snow);
        assert_eq!(TerrainType::from_height(1.0), TerrainType::Snow);
    }

    #[test]
    fn terrain_codes_round_trip() {
        for t in TerrainType::ALL {
            assert_eq!(TerrainType::from_code(t.code()), Ok(t));
        }
        assert_eq!(
            TerrainType::from_code(7),
            Err(MapError::UnknownTerrainCode(7))
        );
    }

    #[test]
    fn terrain_grid_from_codes_rejects_garbage() {
        assert!(TerrainGrid::from_codes(2, 1, &[0, 9]).is_err());
        let g = TerrainGrid::from_codes(2, 1, &[2, 4]).unwrap();
        assert_eq!(g.get(1, 0), TerrainType::Forest);
        assert_eq!(g.to_codes(), vec![2, 4]);
    }
}
