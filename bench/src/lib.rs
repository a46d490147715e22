// Shared fixtures for the criterion benches

use empire_core::{MapConfig, MapGenerator};

pub const SIZE: usize = 512;
pub const SEED: &str = "2025";

pub fn generator() -> MapGenerator {
    MapGenerator::new(MapConfig::new(SIZE, SIZE).with_seed(SEED))
        .unwrap_or_else(|err| panic!("bench config must be valid: {err}"))
}
