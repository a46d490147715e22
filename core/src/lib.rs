// core holds the map pipeline: noise, height field, terrain classes,
// blend tables and tile planning
pub mod blend;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod heightfield;
pub mod mask;
pub mod seed;
pub mod simplex2;
pub mod terrain;
pub mod tiles;
pub mod utils;

pub use blend::{BlendMap, build_dirt_stone_blend_map, build_sand_grass_blend_map};
pub use classifier::TerrainClassifier;
pub use config::{Dimensions, MapConfig, MapSize};
pub use error::{MapError, MapResult};
pub use generator::{GeneratedMap, MapGenerator, generate};
pub use grid::{Grid, HeightField};
pub use heightfield::HeightFieldGenerator;
pub use mask::{Direction, NeighborMask, compute_neighbor_mask};
pub use seed::Seed;
pub use simplex2::Simplex2D;
pub use terrain::{TerrainGrid, TerrainType};
pub use tiles::{TilePlan, TilePlanner};

// Seeded 2D coherent noise sampled at any finite point.
// Output is in [-1, 1]; callers rescale. Implementations are immutable after
// construction so rayon workers can share them.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}
