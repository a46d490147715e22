// Generates one map and saves three previews:
// raw heights, tinted heights and the minimap-colored terrain classes

use empire_core::utils::{height_image, shaded_height_image, terrain_image};
use empire_core::{MapConfig, MapGenerator, MapSize, TerrainType};
use std::path::Path;

fn main() {
    let config = MapConfig::from_size(MapSize::Small).with_seed("preview");
    let map = MapGenerator::new(config).unwrap().generate();

    height_image(&map.height_field)
        .save(Path::new("map_heights.png"))
        .unwrap();
    shaded_height_image(&map.height_field)
        .save(Path::new("map_shaded.png"))
        .unwrap();
    terrain_image(&map.terrain_grid)
        .save(Path::new("map_terrain.png"))
        .unwrap();

    let cells = (map.width() * map.height()) as f32;
    for t in TerrainType::ALL {
        let share = map.terrain_grid.count(t) as f32 / cells * 100.0;
        println!("{:>10}: {:5.1}%", t.name(), share);
    }
    println!("Saved map_heights.png, map_shaded.png, map_terrain.png");
}
