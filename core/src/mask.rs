use crate::grid::Grid;

// Compass directions in bit order. Offsets are (dx, dy) with y growing south.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }
}

// Which of the 8 neighbors belong to the "other" terrain.
// N=1, NE=2, E=4, SE=8, S=16, SW=32, W=64, NW=128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NeighborMask(pub u8);

impl NeighborMask {
    pub const EMPTY: NeighborMask = NeighborMask(0);
    pub const FULL: NeighborMask = NeighborMask(255);

    #[allow(clippy::too_many_arguments)]
    pub fn from_flags(
        n: bool,
        ne: bool,
        e: bool,
        se: bool,
        s: bool,
        sw: bool,
        w: bool,
        nw: bool,
    ) -> Self {
        let flags = [n, ne, e, se, s, sw, w, nw];
        let mut mask = 0u8;
        for (dir, set) in Direction::ALL.iter().zip(flags) {
            if set {
                mask |= dir.bit();
            }
        }
        NeighborMask(mask)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn with(self, dir: Direction) -> Self {
        NeighborMask(self.0 | dir.bit())
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl From<NeighborMask> for u8 {
    fn from(mask: NeighborMask) -> u8 {
        mask.0
    }
}

// Neighbors off the edge of the map never match
pub fn compute_neighbor_mask<T: Copy>(
    grid: &Grid<T>,
    x: usize,
    y: usize,
    is_match: impl Fn(T) -> bool,
) -> NeighborMask {
    let (x, y) = (x as isize, y as isize);
    let mut mask = NeighborMask::EMPTY;
    for dir in Direction::ALL {
        let (dx, dy) = dir.offset();
        if grid.get_signed(x + dx, y + dy).is_some_and(&is_match) {
            mask = mask.with(dir);
        }
    }
    mask
}
