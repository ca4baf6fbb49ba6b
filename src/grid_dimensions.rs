use error_chain::bail;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::units::{Height, NodesCount, Width};

/// Smallest grid width that can hold the built-in motif footprint.
pub const MIN_WIDTH: usize = 7;
/// Smallest grid height that can hold the built-in motif footprint.
pub const MIN_HEIGHT: usize = 5;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridDimensions {
    width: Width,
    height: Height,
}

impl GridDimensions {
    pub fn new(width: Width, height: Height) -> Result<GridDimensions> {
        if width.0 < MIN_WIDTH || height.0 < MIN_HEIGHT {
            bail!(ErrorKind::InvalidDimension(width.0, height.0));
        }
        Ok(GridDimensions { width, height })
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.width.0 * self.height.0)
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.row < self.height.0 && coord.column < self.width.0
    }

    /// Convert a grid coordinate to a one dimensional row-major index in the range 0...size.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row * self.width.0 + coord.column)
        } else {
            None
        }
    }

    #[inline]
    pub fn coordinate_from_row_major_index(&self, index: usize) -> GridCoordinate {
        GridCoordinate::new(index / self.width.0, index % self.width.0)
    }

    /// Like `is_valid_coordinate` but as an `OutOfBounds` error.
    pub fn check_coordinate(&self, coord: GridCoordinate) -> Result<()> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(ErrorKind::OutOfBounds(coord, self.width.0, self.height.0).into())
        }
    }

    /// Is the coordinate on the outermost ring of cells?
    pub fn is_on_boundary(&self, coord: GridCoordinate) -> bool {
        self.is_valid_coordinate(coord) &&
        (coord.row == 0 || coord.column == 0 || coord.row == self.height.0 - 1 ||
         coord.column == self.width.0 - 1)
    }
}
