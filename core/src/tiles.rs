use rand::Rng;

use crate::blend::{BLEND_TILE_COUNT, BlendMap, dirt_stone_blend_map, sand_grass_blend_map};
use crate::mask::{NeighborMask, compute_neighbor_mask};
use crate::terrain::{TerrainGrid, TerrainType};

pub const MOUNTAIN_TINT: u32 = 0xAAAAAA;
pub const SNOW_TINT: u32 = 0xFFFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTile {
    Water,
    Sand,
    // Grass and forest ground share the dirt texture
    Dirt,
    Stone { tint: u32 },
}

impl BaseTile {
    pub fn for_terrain(terrain: TerrainType) -> Self {
        match terrain {
            TerrainType::DeepWater | TerrainType::Water => BaseTile::Water,
            TerrainType::Sand => BaseTile::Sand,
            TerrainType::Grass | TerrainType::Forest => BaseTile::Dirt,
            TerrainType::Mountain => BaseTile::Stone {
                tint: MOUNTAIN_TINT,
            },
            TerrainType::Snow => BaseTile::Stone { tint: SNOW_TINT },
        }
    }

    // Water is drawn unrotated so its pattern lines up across cells
    pub fn rotates(self) -> bool {
        !matches!(self, BaseTile::Water)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeVariant {
    Tree1,
    Tree2,
}

// Quarter turns clockwise, 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rotation(pub u8);

impl Rotation {
    pub fn radians(self) -> f32 {
        self.0 as f32 * std::f32::consts::FRAC_PI_2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayer {
    Base { tile: BaseTile, rotation: Rotation },
    // Index into the transition atlas of the rule that matched
    Blend { rule: usize, tile: u8 },
}

// What to draw for one cell: a ground layer and an optional tree on top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlan {
    pub ground: TileLayer,
    pub tree: Option<TreeVariant>,
}

// A transition between a cell's own terrain and its neighbors', drawn with
// a dedicated atlas when the neighbor pattern has art.
pub struct BlendRule {
    pub name: &'static str,
    pub applies_to: fn(TerrainType) -> bool,
    pub neighbor: fn(TerrainType) -> bool,
    pub map: &'static BlendMap,
    // Tiles actually loaded for this atlas; indices at or past it fall back
    pub tile_count: u8,
}

impl BlendRule {
    pub fn sand_grass() -> Self {
        Self {
            name: "sand_grass",
            applies_to: |t| t == TerrainType::Sand,
            neighbor: TerrainType::is_grassland,
            map: sand_grass_blend_map(),
            tile_count: BLEND_TILE_COUNT,
        }
    }

    pub fn dirt_stone() -> Self {
        Self {
            name: "dirt_stone",
            applies_to: TerrainType::is_grassland,
            neighbor: TerrainType::is_rock,
            map: dirt_stone_blend_map(),
            tile_count: BLEND_TILE_COUNT,
        }
    }

    pub fn mask_at(&self, grid: &TerrainGrid, x: usize, y: usize) -> NeighborMask {
        compute_neighbor_mask(grid, x, y, self.neighbor)
    }

    pub fn tile_at(&self, grid: &TerrainGrid, x: usize, y: usize) -> Option<u8> {
        if !(self.applies_to)(grid.get(x, y)) {
            return None;
        }
        self.map
            .lookup(self.mask_at(grid, x, y))
            .filter(|&tile| tile < self.tile_count)
    }
}

// Picks ground and decoration for each cell. The first matching blend rule
// replaces the base tile; otherwise the base tile is drawn with a random
// rotation.
pub struct TilePlanner {
    rules: Vec<BlendRule>,
}

impl TilePlanner {
    pub fn new() -> Self {
        Self::with_rules(vec![BlendRule::sand_grass()])
    }

    pub fn with_rules(rules: Vec<BlendRule>) -> Self {
        for rule in &rules {
            tracing::debug!("blend rule {} with {} tiles", rule.name, rule.tile_count);
        }
        Self { rules }
    }

    // All randomness comes from `rng`, so a seeded rng replays the same plan
    pub fn plan_tile<R: Rng>(
        &self,
        grid: &TerrainGrid,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> TilePlan {
        let terrain = grid.get(x, y);

        let blended = self
            .rules
            .iter()
            .enumerate()
            .find_map(|(i, rule)| rule.tile_at(grid, x, y).map(|tile| (i, tile)));

        let ground = match blended {
            Some((rule, tile)) => TileLayer::Blend { rule, tile },
            None => {
                let tile = BaseTile::for_terrain(terrain);
                let rotation = if tile.rotates() {
                    Rotation(rng.gen_range(0..4))
                } else {
                    Rotation::default()
                };
                TileLayer::Base { tile, rotation }
            }
        };

        let tree = (terrain == TerrainType::Forest).then(|| {
            if rng.gen_bool(0.5) {
                TreeVariant::Tree1
            } else {
                TreeVariant::Tree2
            }
        });

        TilePlan { ground, tree }
    }

    // Row-major plan for the whole map
    pub fn plan_map<R: Rng>(&self, grid: &TerrainGrid, rng: &mut R) -> Vec<TilePlan> {
        let mut plans = Vec::with_capacity(grid.width() * grid.height());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                plans.push(self.plan_tile(grid, x, y, rng));
            }
        }
        plans
    }
}

impl Default for TilePlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::terrain::TerrainType::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(cells: Vec<TerrainType>) -> TerrainGrid {
        Grid::from_vec(3, 3, cells).unwrap()
    }

    #[test]
    fn sand_surrounded_by_grass_blends() {
        let g = grid(vec![
            Grass, Forest, Grass, //
            Grass, Sand, Grass, //
            Forest, Grass, Grass,
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = TilePlanner::new().plan_tile(&g, 1, 1, &mut rng);
        assert_eq!(plan.ground, TileLayer::Blend { rule: 0, tile: 0 });
        assert_eq!(plan.tree, None);
    }

    #[test]
    fn sand_with_cross_pattern_uses_tile_one() {
        let g = grid(vec![
            Water, Grass, Water, //
            Grass, Sand, Grass, //
            Water, Grass, Water,
        ]);
        assert_eq!(BlendRule::sand_grass().mask_at(&g, 1, 1).bits(), 85);
        assert_eq!(BlendRule::sand_grass().tile_at(&g, 1, 1), Some(1));
    }

    #[test]
    fn unlisted_pattern_falls_back_to_base() {
        let mut g = grid(vec![Water; 9]);
        g.set(1, 1, Sand);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = TilePlanner::new().plan_tile(&g, 1, 1, &mut rng);
        assert!(matches!(
            plan.ground,
            TileLayer::Base {
                tile: BaseTile::Sand,
                ..
            }
        ));
    }

    #[test]
    fn missing_atlas_tiles_fall_back() {
        let g = grid(vec![Grass, Grass, Grass, Grass, Sand, Grass, Grass, Grass, Grass]);
        let rule = BlendRule {
            tile_count: 0,
            ..BlendRule::sand_grass()
        };
        assert_eq!(rule.tile_at(&g, 1, 1), None);
    }

    #[test]
    fn water_never_rotates_and_forest_gets_tree() {
        let g = grid(vec![Water, Forest, Mountain, Snow, Grass, DeepWater, Water, Water, Water]);
        let planner = TilePlanner::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..16 {
            let water = planner.plan_tile(&g, 0, 0, &mut rng);
            assert_eq!(
                water.ground,
                TileLayer::Base {
                    tile: BaseTile::Water,
                    rotation: Rotation(0)
                }
            );
            let forest = planner.plan_tile(&g, 1, 0, &mut rng);
            assert!(forest.tree.is_some());
            assert!(matches!(
                forest.ground,
                TileLayer::Base {
                    tile: BaseTile::Dirt,
                    ..
                }
            ));
        }
        let snow = planner.plan_tile(&g, 0, 1, &mut rng);
        assert!(matches!(
            snow.ground,
            TileLayer::Base {
                tile: BaseTile::Stone { tint: SNOW_TINT },
                ..
            }
        ));
    }

    #[test]
    fn dirt_stone_rule_is_opt_in() {
        let g = grid(vec![
            Mountain, Mountain, Mountain, //
            Mountain, Grass, Mountain, //
            Mountain, Mountain, Mountain,
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plain = TilePlanner::new().plan_tile(&g, 1, 1, &mut rng);
        assert!(matches!(plain.ground, TileLayer::Base { .. }));

        let planner = TilePlanner::with_rules(vec![BlendRule::sand_grass(), BlendRule::dirt_stone()]);
        let blended = planner.plan_tile(&g, 1, 1, &mut rng);
        assert_eq!(blended.ground, TileLayer::Blend { rule: 1, tile: 0 });
    }

    #[test]
    fn plans_replay_with_same_rng_seed() {
        let g = grid(vec![Grass, Forest, Sand, Mountain, Snow, Forest, Grass, Sand, Water]);
        let planner = TilePlanner::new();
        let a = planner.plan_map(&g, &mut ChaCha8Rng::seed_from_u64(42));
        let b = planner.plan_map(&g, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 9);
    }

    #[test]
    fn rotation_radians() {
        assert_eq!(Rotation(0).radians(), 0.0);
        assert!((Rotation(2).radians() - std::f32::consts::PI).abs() < 1e-6);
    }
}
