use std::fmt;

use crate::cells::GridCoordinate;
use crate::grid_dimensions::GridDimensions;
use crate::units::{ColumnIndex, RowIndex};

/// Row-major walk over every coordinate of a grid.
#[derive(Clone)]
pub struct CellIter {
    dimensions: GridDimensions,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(dimensions: GridDimensions) -> CellIter {
        CellIter {
            dimensions,
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = self.dimensions.coordinate_from_row_major_index(self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Yields one `Vec` of coordinates per grid row, north to south.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    dimensions: GridDimensions,
    current_index: usize,
}

impl RowIter {
    pub fn new(dimensions: GridDimensions) -> RowIter {
        RowIter {
            dimensions,
            current_index: 0,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index < self.dimensions.height().0 {
            let row = self.current_index;
            let coords = (0..self.dimensions.width().0)
                .map(|column| {
                    GridCoordinate::from_row_column_indices(RowIndex(row), ColumnIndex(column))
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dimensions.height().0 - self.current_index;
        (remaining, Some(remaining))
    }
}
