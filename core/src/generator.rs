use std::time::Instant;

use tracing::{debug, info};

use crate::blend::sand_grass_blend_map;
use crate::classifier::TerrainClassifier;
use crate::config::{Dimensions, MapConfig};
use crate::error::MapResult;
use crate::grid::HeightField;
use crate::heightfield::HeightFieldGenerator;
use crate::mask::{NeighborMask, compute_neighbor_mask};
use crate::seed::Seed;
use crate::simplex2::Simplex2D;
use crate::terrain::{TerrainGrid, TerrainType};

// Output of one generation run. The seed is kept so a run without an
// explicit seed can still be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    pub seed: Seed,
    pub height_field: HeightField,
    pub terrain_grid: TerrainGrid,
}

impl GeneratedMap {
    pub fn width(&self) -> usize {
        self.terrain_grid.width()
    }

    pub fn height(&self) -> usize {
        self.terrain_grid.height()
    }

    // Terrain as one byte per cell, row-major
    pub fn terrain_data(&self) -> Vec<u8> {
        self.terrain_grid.to_codes()
    }

    // Sand/grass mask and matching transition tile for a cell. Only sand
    // cells have a mask; anything else, or a cell off the map, gives None.
    pub fn probe_sand_mask(&self, x: usize, y: usize) -> Option<(NeighborMask, Option<u8>)> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        if self.terrain_grid.get(x, y) != TerrainType::Sand {
            return None;
        }
        let mask = compute_neighbor_mask(&self.terrain_grid, x, y, TerrainType::is_grassland);
        Some((mask, sand_grass_blend_map().lookup(mask)))
    }
}

pub struct MapGenerator {
    dims: Dimensions,
    seed: Seed,
    heights: HeightFieldGenerator<Simplex2D>,
    classifier: TerrainClassifier<Simplex2D>,
}

impl MapGenerator {
    // Validates everything up front; a generator that exists can always run
    pub fn new(config: MapConfig) -> MapResult<Self> {
        let dims = config.validate()?;
        let seed = match config.seed.as_deref() {
            Some(text) => Seed::new(text),
            None => Seed::random(),
        };
        let heights = HeightFieldGenerator::new(Simplex2D::new(&seed), dims, config.terrain)?;
        let forest_seed = seed.derive(&config.forest.seed_suffix);
        let classifier =
            TerrainClassifier::new(Simplex2D::new(&forest_seed), config.beach, config.forest)?;
        Ok(Self {
            dims,
            seed,
            heights,
            classifier,
        })
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn generate_height_field(&self) -> HeightField {
        self.heights.generate()
    }

    pub fn classify(&self, heights: &HeightField) -> TerrainGrid {
        self.classifier.classify(heights)
    }

    pub fn generate(&self) -> GeneratedMap {
        info!(
            "Generating {}x{} map (seed {:?})",
            self.dims.width(),
            self.dims.height(),
            self.seed.as_str()
        );

        let start = Instant::now();
        let height_field = self.generate_height_field();
        debug!("height field done in {:.2?}", start.elapsed());

        let start = Instant::now();
        let terrain_grid = self.classify(&height_field);
        debug!("classification done in {:.2?}", start.elapsed());

        GeneratedMap {
            seed: self.seed.clone(),
            height_field,
            terrain_grid,
        }
    }
}

// Single entry point: validate, then build heights and terrain.
// Without a seed the map comes from fresh entropy; the seed used is on the
// result.
pub fn generate(width: usize, height: usize, seed: Option<&str>) -> MapResult<GeneratedMap> {
    let mut config = MapConfig::new(width, height);
    config.seed = seed.map(str::to_string);
    Ok(MapGenerator::new(config)?.generate())
}
