use thiserror::Error;

// Everything that can go wrong is a configuration problem caught before
// any cell is generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("map {axis} must be between {min} and {max}, got {value}")]
    DimensionOutOfRange {
        axis: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("blend entry mask={mask} tile={tile} is out of range")]
    InvalidBlendEntry { mask: u16, tile: u8 },

    #[error("grid data has {actual} cells, expected {expected}")]
    GridSizeMismatch { expected: usize, actual: usize },

    #[error("unknown terrain code {0}")]
    UnknownTerrainCode(u8),
}

pub type MapResult<T> = Result<T, MapError>;
