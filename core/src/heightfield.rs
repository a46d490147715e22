use rayon::prelude::*;

use crate::NoiseSource;
use crate::config::{Dimensions, HeightParams};
use crate::error::MapResult;
use crate::grid::HeightField;

// Stacks octaves of a noise source into a [0, 1] height per cell and fades
// the edges of the map down to water.
pub struct HeightFieldGenerator<N> {
    noise: N,
    params: HeightParams,
    dims: Dimensions,
    border_size: usize,
}

impl<N: NoiseSource> HeightFieldGenerator<N> {
    // Params are checked here too, since the octave loop divides by the
    // total weight and must stay finite
    pub fn new(noise: N, dims: Dimensions, params: HeightParams) -> MapResult<Self> {
        params.validate()?;
        // Width drives the border on both axes
        let border_size = (dims.width() as f64 * params.border_fraction).floor() as usize;
        Ok(Self {
            noise,
            params,
            dims,
            border_size,
        })
    }

    pub fn border_size(&self) -> usize {
        self.border_size
    }

    // Height before the border fade, in [0, 1].
    // Each octave is rescaled from [-1, 1] to [0, 1] before weighting and the
    // sum is divided by the total weight, so the result stays bounded for any
    // octave count.
    pub fn raw_height(&self, x: usize, y: usize) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = self.params.base_frequency;
        let mut total = 0.0;
        let mut weight = 0.0;

        for _ in 0..self.params.octaves {
            let sample = self.noise.sample(x as f64 * frequency, y as f64 * frequency);
            total += (sample + 1.0) * 0.5 * amplitude;
            weight += amplitude;
            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }

        total / weight
    }

    // Linear 0..1 ramp inside the border band, 1 elsewhere
    pub fn border_factor(&self, x: usize, y: usize) -> f64 {
        let w = self.dims.width();
        let h = self.dims.height();
        let dist_from_edge = x.min(y).min(w - 1 - x).min(h - 1 - y);
        if dist_from_edge < self.border_size {
            dist_from_edge as f64 / self.border_size as f64
        } else {
            1.0
        }
    }

    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        let value = self.raw_height(x, y) * self.border_factor(x, y);
        value.clamp(0.0, 1.0) as f32
    }

    // Rows are independent, so they are filled in parallel. The output does
    // not depend on scheduling.
    pub fn generate(&self) -> HeightField {
        let width = self.dims.width();
        let mut field = HeightField::filled(width, self.dims.height(), 0.0);

        field
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = self.height_at(x, y);
                }
            });

        field
    }
}

#[cfg(test)]
mod tests {
    use super::HeightFieldGenerator;
    use crate::config::{
        Dimensions, HeightParams, MAX_BASE_FREQUENCY, MAX_LACUNARITY, MAX_OCTAVES, MAX_PERSISTENCE,
    };
    use crate::{MapError, NoiseSource, Seed, Simplex2D};

    struct Constant(f64);

    impl NoiseSource for Constant {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    fn dims(w: usize, h: usize) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    #[test]
    fn heightfield_normalizes_octaves() {
        // Max noise in every octave must normalize to exactly 1
        for octaves in [1, 3, 6, 12] {
            let params = HeightParams {
                octaves,
                ..HeightParams::default()
            };
            let hf = HeightFieldGenerator::new(Constant(1.0), dims(40, 40), params).unwrap();
            assert!((hf.raw_height(20, 20) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn heightfield_rejects_unchecked_params() {
        let params = HeightParams {
            octaves: 0,
            ..HeightParams::default()
        };
        let result = HeightFieldGenerator::new(Constant(1.0), dims(20, 20), params);
        assert!(matches!(
            result.err(),
            Some(MapError::InvalidParameter { name: "octaves", .. })
        ));

        let params = HeightParams {
            persistence: 1e100,
            ..HeightParams::default()
        };
        assert!(HeightFieldGenerator::new(Constant(1.0), dims(20, 20), params).is_err());
    }

    #[test]
    fn heightfield_extreme_params_stay_in_range() {
        let params = HeightParams {
            octaves: MAX_OCTAVES,
            persistence: MAX_PERSISTENCE,
            lacunarity: MAX_LACUNARITY,
            base_frequency: MAX_BASE_FREQUENCY,
            border_fraction: 0.05,
        };
        let noise = Simplex2D::new(&Seed::new("extreme"));
        let field = HeightFieldGenerator::new(noise, dims(40, 40), params)
            .unwrap()
            .generate();
        for (_, _, v) in field.cells() {
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn heightfield_border_fades_linearly() {
        let hf =
            HeightFieldGenerator::new(Constant(1.0), dims(100, 60), HeightParams::default()).unwrap();
        assert_eq!(hf.border_size(), 5);
        assert_eq!(hf.height_at(0, 30), 0.0);
        assert!((hf.height_at(2, 30) - 0.4).abs() < 1e-6);
        assert!((hf.height_at(50, 57) - 0.4).abs() < 1e-6);
        assert_eq!(hf.height_at(5, 30), 1.0);
        assert_eq!(hf.height_at(50, 30), 1.0);
    }

    #[test]
    fn heightfield_narrow_map_has_no_border() {
        // floor(19 * 0.05) == 0
        let hf =
            HeightFieldGenerator::new(Constant(0.0), dims(19, 19), HeightParams::default()).unwrap();
        assert_eq!(hf.border_size(), 0);
        assert_eq!(hf.height_at(0, 0), 0.5);
    }

    #[test]
    fn heightfield_generate_matches_per_cell() {
        let noise = Simplex2D::new(&Seed::new("rows"));
        let hf = HeightFieldGenerator::new(noise, dims(48, 24), HeightParams::default()).unwrap();
        let field = hf.generate();
        assert_eq!(field.width(), 48);
        assert_eq!(field.height(), 24);
        for (x, y, v) in field.cells() {
            assert_eq!(v.to_bits(), hf.height_at(x, y).to_bits());
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
