use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

pub const MIN_DIMENSION: usize = 10;
pub const MAX_DIMENSION: usize = 3000;

// Octave bounds keep persistence^(octaves-1) and the top octave's sample
// coordinates finite for every accepted config
pub const MAX_OCTAVES: u32 = 16;
pub const MAX_PERSISTENCE: f64 = 2.0;
pub const MAX_LACUNARITY: f64 = 4.0;
pub const MAX_BASE_FREQUENCY: f64 = 1.0;
// Each land cell scans (2r+1)^2 neighbors for water
pub const MAX_BEACH_RADIUS: usize = 16;

// Validated map size. Construction is the only place the bounds are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> MapResult<Self> {
        check_axis("width", width)?;
        check_axis("height", height)?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

fn check_axis(axis: &'static str, value: usize) -> MapResult<()> {
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        return Err(MapError::DimensionOutOfRange {
            axis,
            value,
            min: MIN_DIMENSION,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

// Square presets offered by the game's lobby settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl MapSize {
    pub fn side(self) -> usize {
        match self {
            MapSize::Small => 256,
            MapSize::Medium => 512,
            MapSize::Large => 1024,
        }
    }

    // Unknown names fall back to Medium, matching the lobby's behavior
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => MapSize::Small,
            "medium" => MapSize::Medium,
            "large" => MapSize::Large,
            _ => MapSize::default(),
        }
    }
}

// Octave stacking and border fade for the height field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    // Noise-space frequency of the first octave, per cell
    pub base_frequency: f64,
    // Fraction of the map width that fades to water at every edge
    pub border_fraction: f64,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            base_frequency: 0.005,
            border_fraction: 0.05,
        }
    }
}

impl HeightParams {
    pub fn validate(&self) -> MapResult<()> {
        if !(1..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(invalid("octaves", &format!("must be in 1..={MAX_OCTAVES}")));
        }
        bounded("persistence", self.persistence, MAX_PERSISTENCE)?;
        bounded("lacunarity", self.lacunarity, MAX_LACUNARITY)?;
        bounded("base_frequency", self.base_frequency, MAX_BASE_FREQUENCY)?;
        if !self.border_fraction.is_finite() || !(0.0..0.5).contains(&self.border_fraction) {
            return Err(invalid("border_fraction", "must be in [0, 0.5)"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeachParams {
    // Chebyshev radius searched for water around each land cell
    pub radius: usize,
    // Cells up to GRASS threshold + this offset may turn to sand
    pub max_height_offset: f32,
}

impl Default for BeachParams {
    fn default() -> Self {
        Self {
            radius: 2,
            max_height_offset: 0.05,
        }
    }
}

impl BeachParams {
    pub fn validate(&self) -> MapResult<()> {
        if self.radius > MAX_BEACH_RADIUS {
            return Err(invalid(
                "beach.radius",
                &format!("must be at most {MAX_BEACH_RADIUS}"),
            ));
        }
        if !self.max_height_offset.is_finite() {
            return Err(invalid("beach.max_height_offset", "must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub frequency: f64,
    // Forest noise (rescaled to [0, 1]) above this turns grass into forest
    pub density: f64,
    pub seed_suffix: String,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            frequency: 0.02,
            density: 0.45,
            seed_suffix: "-forest".to_string(),
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> MapResult<()> {
        positive("forest.frequency", self.frequency)?;
        if !self.density.is_finite() {
            return Err(invalid("forest.density", "must be finite"));
        }
        Ok(())
    }
}

// Everything a generation run needs. Deserializable from TOML with every
// field optional except the dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub terrain: HeightParams,
    #[serde(default)]
    pub beach: BeachParams,
    #[serde(default)]
    pub forest: ForestParams,
}

impl MapConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            seed: None,
            terrain: HeightParams::default(),
            beach: BeachParams::default(),
            forest: ForestParams::default(),
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn from_size(size: MapSize) -> Self {
        Self::new(size.side(), size.side())
    }

    pub fn validate(&self) -> MapResult<Dimensions> {
        let dims = Dimensions::new(self.width, self.height)?;
        self.terrain.validate()?;
        self.beach.validate()?;
        self.forest.validate()?;
        Ok(dims)
    }
}

fn invalid(name: &'static str, reason: &str) -> MapError {
    MapError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

fn positive(name: &'static str, value: f64) -> MapResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(name, "must be a positive finite number"));
    }
    Ok(())
}

fn bounded(name: &'static str, value: f64, max: f64) -> MapResult<()> {
    positive(name, value)?;
    if value > max {
        return Err(invalid(name, &format!("must be at most {max}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_bounds() {
        assert!(Dimensions::new(10, 10).is_ok());
        assert!(Dimensions::new(3000, 3000).is_ok());
        assert!(Dimensions::new(9, 100).is_err());
        assert!(matches!(
            Dimensions::new(3001, 10),
            Err(MapError::DimensionOutOfRange {
                axis: "width",
                value: 3001,
                ..
            })
        ));
        assert!(matches!(
            Dimensions::new(10, 0),
            Err(MapError::DimensionOutOfRange { axis: "height", .. })
        ));
    }

    #[test]
    fn map_size_presets() {
        assert_eq!(MapSize::parse_or_default("small").side(), 256);
        assert_eq!(MapSize::parse_or_default("LARGE").side(), 1024);
        assert_eq!(MapSize::parse_or_default("huge"), MapSize::Medium);
    }

    #[test]
    fn height_params_rejects_zero_octaves() {
        let params = HeightParams {
            octaves: 0,
            ..HeightParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(MapError::InvalidParameter { name: "octaves", .. })
        ));
    }

    #[test]
    fn height_params_rejects_overflowing_octaves() {
        for params in [
            HeightParams {
                persistence: 1e100,
                ..HeightParams::default()
            },
            HeightParams {
                lacunarity: 1e200,
                ..HeightParams::default()
            },
            HeightParams {
                base_frequency: f64::MAX,
                ..HeightParams::default()
            },
            HeightParams {
                octaves: MAX_OCTAVES + 1,
                ..HeightParams::default()
            },
        ] {
            assert!(matches!(
                params.validate(),
                Err(MapError::InvalidParameter { .. })
            ));
        }

        let mut cfg = MapConfig::new(20, 20);
        cfg.terrain.persistence = 1e100;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn height_params_accepts_upper_bounds() {
        let params = HeightParams {
            octaves: MAX_OCTAVES,
            persistence: MAX_PERSISTENCE,
            lacunarity: MAX_LACUNARITY,
            base_frequency: MAX_BASE_FREQUENCY,
            border_fraction: 0.0,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn beach_radius_is_capped() {
        let mut cfg = MapConfig::new(20, 20);
        cfg.beach.radius = MAX_BEACH_RADIUS;
        assert!(cfg.validate().is_ok());
        cfg.beach.radius = 100_000;
        assert!(matches!(
            cfg.validate(),
            Err(MapError::InvalidParameter {
                name: "beach.radius",
                ..
            })
        ));
    }

    #[test]
    fn height_params_rejects_wide_border() {
        let params = HeightParams {
            border_fraction: 0.5,
            ..HeightParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn config_defaults_validate() {
        let cfg = MapConfig::new(64, 32).with_seed("abc");
        let dims = cfg.validate().unwrap();
        assert_eq!((dims.width(), dims.height()), (64, 32));
        assert_eq!(cfg.seed.as_deref(), Some("abc"));
    }
}
