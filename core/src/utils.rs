use image::{GrayImage, Luma, Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

use crate::grid::HeightField;
use crate::terrain::{TerrainGrid, TerrainType};

// Flat colors used by the minimap
pub fn terrain_color(terrain: TerrainType) -> [u8; 3] {
    let hex: u32 = match terrain {
        TerrainType::DeepWater => 0x000033,
        TerrainType::Water => 0x000066,
        TerrainType::Sand => 0xffff99,
        TerrainType::Grass => 0x006600,
        TerrainType::Forest => 0x003300,
        TerrainType::Mountain => 0x999999,
        TerrainType::Snow => 0xffffff,
    };
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

// One pixel per cell
pub fn terrain_image(grid: &TerrainGrid) -> RgbImage {
    let mut img = RgbImage::new(grid.width() as u32, grid.height() as u32);
    for (x, y, t) in grid.cells() {
        img.put_pixel(x as u32, y as u32, Rgb(terrain_color(t)));
    }
    img
}

// Heights are already in [0, 1], so no min/max stretch is applied
pub fn height_image(field: &HeightField) -> GrayImage {
    let mut img = GrayImage::new(field.width() as u32, field.height() as u32);
    for (x, y, h) in field.cells() {
        let gray = (h.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel(x as u32, y as u32, Luma([gray]));
    }
    img
}

// Height tinted through a water-to-snow gradient whose stops sit on the
// classification thresholds
pub fn shaded_height_image(field: &HeightField) -> RgbImage {
    let gradient = Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.15)), // deep water
        (0.30, LinSrgb::new(0.0, 0.1, 0.5)),  // shallow water
        (0.40, LinSrgb::new(0.9, 0.85, 0.5)), // sand
        (0.45, LinSrgb::new(0.1, 0.5, 0.1)),  // grass
        (0.78, LinSrgb::new(0.5, 0.5, 0.5)),  // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)),  // snow
    ]);

    let mut img = RgbImage::new(field.width() as u32, field.height() as u32);
    for (x, y, h) in field.cells() {
        let col: LinSrgb = gradient.get(h.clamp(0.0, 1.0));
        let rgb = col.into_format::<u8>();
        img.put_pixel(x as u32, y as u32, Rgb([rgb.red, rgb.green, rgb.blue]));
    }
    img
}
