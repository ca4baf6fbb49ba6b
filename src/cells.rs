use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::errors::*;
use crate::units::{ColumnIndex, RowIndex};

/// A cell position on a rectangular grid, addressed as (row, column).
///
/// Row 0 is the northern edge, column 0 the western edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: usize,
    pub column: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate { row, column }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Self {
        let (RowIndex(row), ColumnIndex(column)) = (row_index, col_index);
        GridCoordinate::new(row, column)
    }

    /// The coordinate one step away in `direction`.
    ///
    /// Returns None when the step would go north of row 0 or west of column 0. Stepping past the
    /// southern or eastern edge is not detected here, the grid dimensions decide that.
    pub fn offset(self, direction: CompassPrimary) -> Option<GridCoordinate> {
        let GridCoordinate { row, column } = self;
        match direction {
            CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, column)),
            CompassPrimary::East => Some(GridCoordinate::new(row, column + 1)),
            CompassPrimary::South => Some(GridCoordinate::new(row + 1, column)),
            CompassPrimary::West => column.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
        }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

/// Parses the `row,col` form written by `Display`. Whitespace around either number is allowed.
impl FromStr for GridCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<GridCoordinate> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(row), Some(column), None) => {
                let row = row.trim().parse::<usize>()?;
                let column = column.trim().parse::<usize>()?;
                Ok(GridCoordinate::new(row, column))
            }
            _ => Err(format!("expected row,col but found {:?}", s).into()),
        }
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

/// The order in which neighbours are enumerated everywhere. Generation and solving
/// both depend on it for reproducible output.
pub const CANONICAL_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                       CompassPrimary::East,
                                                       CompassPrimary::South,
                                                       CompassPrimary::West];

impl CompassPrimary {
    /// Wall bit for this side of a cell: N=1, E=2, S=4, W=8.
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            CompassPrimary::North => 1,
            CompassPrimary::East => 2,
            CompassPrimary::South => 4,
            CompassPrimary::West => 8,
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CompassPrimary::North => 'N',
            CompassPrimary::East => 'E',
            CompassPrimary::South => 'S',
            CompassPrimary::West => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<CompassPrimary> {
        match c {
            'N' => Some(CompassPrimary::North),
            'E' => Some(CompassPrimary::East),
            'S' => Some(CompassPrimary::South),
            'W' => Some(CompassPrimary::West),
            _ => None,
        }
    }
}

/// The four walls of one cell packed into the low nibble of a byte.
///
/// A set bit is a wall, a cleared bit an open passage.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct WallMask(u8);

impl WallMask {
    pub const CLOSED: WallMask = WallMask(0b1111);
    pub const OPEN: WallMask = WallMask(0);

    /// Any value above 15 is not a wall mask.
    pub fn from_bits(bits: u8) -> Option<WallMask> {
        if bits <= 0b1111 {
            Some(WallMask(bits))
        } else {
            None
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn has_wall(self, direction: CompassPrimary) -> bool {
        self.0 & direction.bit() != 0
    }

    #[inline]
    pub fn clear(&mut self, direction: CompassPrimary) {
        self.0 &= !direction.bit();
    }

    /// The directions with a cleared wall, in canonical order.
    pub fn open_directions(self) -> DirectionSmallVec {
        CANONICAL_DIRECTIONS.iter()
                            .cloned()
                            .filter(|dir| !self.has_wall(*dir))
                            .collect()
    }

    /// Upper case hexadecimal digit for this mask.
    pub fn to_hex_digit(self) -> char {
        std::char::from_digit(u32::from(self.0), 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    pub fn from_hex_digit(c: char) -> Option<WallMask> {
        c.to_digit(16).map(|d| WallMask(d as u8))
    }
}

impl Default for WallMask {
    fn default() -> WallMask {
        WallMask::CLOSED
    }
}
