use rayon::prelude::*;

use crate::NoiseSource;
use crate::config::{BeachParams, ForestParams};
use crate::error::MapResult;
use crate::grid::HeightField;
use crate::terrain::{GRASS_THRESHOLD, SAND_THRESHOLD, TerrainGrid, TerrainType};

// Turns a height field into terrain labels: threshold bands first, then
// beaches along the water, then forest patches scattered over grass.
pub struct TerrainClassifier<F> {
    forest_noise: F,
    beach: BeachParams,
    forest: ForestParams,
}

impl<F: NoiseSource> TerrainClassifier<F> {
    pub fn new(forest_noise: F, beach: BeachParams, forest: ForestParams) -> MapResult<Self> {
        beach.validate()?;
        forest.validate()?;
        Ok(Self {
            forest_noise,
            beach,
            forest,
        })
    }

    pub fn classify(&self, heights: &HeightField) -> TerrainGrid {
        let base = classify_bands(heights);
        let mut grid = self.widen_beaches(heights, &base);
        self.scatter_forests(&mut grid);
        grid
    }

    // Land cells close to water (and not too high) become sand.
    // `base` is only read; the result is a new grid so a cell turned to sand
    // never influences its neighbors within the same pass.
    pub fn widen_beaches(&self, heights: &HeightField, base: &TerrainGrid) -> TerrainGrid {
        let width = heights.width();
        let mut out = base.clone();
        let max_height = GRASS_THRESHOLD + self.beach.max_height_offset;

        out.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let h = heights.get(x, y);
                    if h <= SAND_THRESHOLD || h >= max_height {
                        continue;
                    }
                    if near_water(base, x, y, self.beach.radius) {
                        *cell = TerrainType::Sand;
                    }
                }
            });

        out
    }

    // Grass whose forest noise clears the density threshold becomes forest.
    // Each decision only looks at its own cell, so this runs in place.
    pub fn scatter_forests(&self, grid: &mut TerrainGrid) {
        let width = grid.width();
        let freq = self.forest.frequency;
        let density = self.forest.density;

        grid.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    if *cell != TerrainType::Grass {
                        continue;
                    }
                    let v = (self.forest_noise.sample(x as f64 * freq, y as f64 * freq) + 1.0) * 0.5;
                    if v > density {
                        *cell = TerrainType::Forest;
                    }
                }
            });
    }
}

pub fn classify_bands(heights: &HeightField) -> TerrainGrid {
    let mut grid = TerrainGrid::filled(heights.width(), heights.height(), TerrainType::DeepWater);
    grid.as_mut_slice()
        .par_iter_mut()
        .zip(heights.as_slice().par_iter())
        .for_each(|(cell, &h)| *cell = TerrainType::from_height(h));
    grid
}

// Any water cell of the banded grid within Chebyshev `radius`, clipped to
// the map. Banded water is exactly the heights under the water threshold.
fn near_water(base: &TerrainGrid, x: usize, y: usize, radius: usize) -> bool {
    let r = radius as isize;
    let (x, y) = (x as isize, y as isize);
    for dy in -r..=r {
        for dx in -r..=r {
            if base
                .get_signed(x + dx, y + dy)
                .is_some_and(TerrainType::is_water)
            {
                return true;
            }
        }
    }
    false
}
