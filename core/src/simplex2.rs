use rand::seq::SliceRandom;

use crate::NoiseSource;
use crate::seed::Seed;

// Gradient directions for 2D simplex: the x/y components of the 12 cube-edge
// gradients, so every gradient has length 1 on at least one axis.
const GRAD2: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

// Approximate value of sqrt(3)
const SQRT_3: f64 = 1.732_050_807_568_877_3;
// Skewing/Unskewing factors for 2D simplex
const F2: f64 = 0.5 * (SQRT_3 - 1.0);
const G2: f64 = (3.0 - SQRT_3) / 6.0;

// Single-octave 2D simplex noise. Octave stacking is the height field's job.
pub struct Simplex2D {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl Simplex2D {
    pub fn new(seed: &Seed) -> Self {
        // Fisher–Yates shuffle of 0..=255 driven by the seed's ChaCha stream
        let mut p: Vec<u8> = (0..=255u8).collect();
        p.shuffle(&mut seed.rng());

        // Duplicate into 512 entries so `perm[i + perm[j]]` never needs a modulo
        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = p[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }

        Self { perm, perm_mod12 }
    }

    #[inline]
    fn corner(&self, gi: usize, x: f64, y: f64) -> f64 {
        // Circular radius of influence
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let (gx, gy) = GRAD2[gi];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    // Raw 2D Simplex noise at (xin, yin)
    fn raw_noise(&self, xin: f64, yin: f64) -> f64 {
        // Skew input space to find the simplex cell
        let s = (xin + yin) * F2;
        let i = (xin + s).floor();
        let j = (yin + s).floor();

        // Unskew back to get the offset from the cell origin
        let t = (i + j) * G2;
        let x0 = xin - (i - t);
        let y0 = yin - (j - t);

        // Lower or upper triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = self.perm_mod12[ii + self.perm[jj] as usize] as usize;
        let gi1 = self.perm_mod12[ii + i1 + self.perm[jj + j1] as usize] as usize;
        let gi2 = self.perm_mod12[ii + 1 + self.perm[jj + 1] as usize] as usize;

        let n = self.corner(gi0, x0, y0) + self.corner(gi1, x1, y1) + self.corner(gi2, x2, y2);

        // Scale to roughly [-1, 1]
        (70.0 * n).clamp(-1.0, 1.0)
    }
}

impl NoiseSource for Simplex2D {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.raw_noise(x, y)
    }
}
