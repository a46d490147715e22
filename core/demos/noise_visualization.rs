use empire_core::{NoiseSource, Seed, Simplex2D};
use image::{GrayImage, Luma};
use std::path::Path;

// Single-octave simplex noise over [0, scale) on both axes
fn save_noise2d<N: NoiseSource>(generator: &N, size: u32, scale: f64, filename: &str) {
    let mut img = GrayImage::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let v = generator.sample(
                x as f64 / size as f64 * scale,
                y as f64 / size as f64 * scale,
            );
            let gray = ((v + 1.0) * 0.5 * 255.0).round() as u8;
            img.put_pixel(x, y, Luma([gray]));
        }
    }
    img.save(Path::new(filename)).unwrap();
    println!("Saved {}", filename);
}

fn main() {
    let seed = Seed::new("noise");
    save_noise2d(&Simplex2D::new(&seed), 256, 8.0, "simplex2d.png");

    // Forest channel: same seed text with a suffix, unrelated pattern
    let forest = seed.derive("-forest");
    save_noise2d(&Simplex2D::new(&forest), 256, 8.0, "simplex2d_forest.png");
}
