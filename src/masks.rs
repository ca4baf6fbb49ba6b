use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use error_chain::bail;
use log::{debug, warn};

use crate::cells::{CANONICAL_DIRECTIONS, CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::grid_dimensions::GridDimensions;

/// The built-in motif, a "42" seven cells wide and five high. `#` cells are reserved.
pub const FORTY_TWO_PATTERN: &str = "
#.#.###
#.#...#
###.###
..#.#..
..#.###
";

/// What happens to reserved motif cells once the rest of the grid has been carved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MotifPolicy {
    /// Reserved cells keep all four walls.
    Blocked,
    /// Walls between adjacent reserved cells are removed. Walls facing the maze stay.
    Opened,
}

impl Default for MotifPolicy {
    fn default() -> MotifPolicy {
        MotifPolicy::Blocked
    }
}

impl FromStr for MotifPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<MotifPolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocked" => Ok(MotifPolicy::Blocked),
            "opened" | "open" => Ok(MotifPolicy::Opened),
            other => bail!(ErrorKind::InvalidConfig(format!("unknown motif policy {:?}", other))),
        }
    }
}

impl fmt::Display for MotifPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MotifPolicy::Blocked => write!(f, "blocked"),
            MotifPolicy::Opened => write!(f, "opened"),
        }
    }
}

/// A fixed shape given as (row, column) offsets relative to its own top left corner.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Motif {
    width: usize,
    height: usize,
    offsets: Vec<(usize, usize)>,
}

impl Motif {
    pub fn forty_two() -> Motif {
        Motif::from_pattern(FORTY_TWO_PATTERN).expect("built-in motif pattern is valid")
    }

    /// Build a motif from text rows where `#` marks a reserved cell and `.` a free one.
    ///
    /// Blank lines are skipped, rows may differ in length.
    pub fn from_pattern(pattern: &str) -> Result<Motif> {
        let mut offsets = vec![];
        let mut width = 0;
        let rows = pattern.lines().map(str::trim).filter(|line| !line.is_empty());

        let mut height = 0;
        for (row, line) in rows.enumerate() {
            for (column, c) in line.chars().enumerate() {
                match c {
                    '#' => offsets.push((row, column)),
                    '.' => {}
                    _ => {
                        bail!(ErrorKind::InvalidConfig(format!("motif pattern has an invalid \
                                                                character {:?} at {},{}",
                                                               c, row, column)))
                    }
                }
            }
            width = width.max(line.chars().count());
            height = row + 1;
        }

        if offsets.is_empty() {
            bail!(ErrorKind::InvalidConfig("motif pattern reserves no cells".to_owned()));
        }
        Ok(Motif { width, height, offsets })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn offsets(&self) -> &[(usize, usize)] {
        &self.offsets
    }

    /// Does the grid leave at least one free cell on every side of the centred motif?
    ///
    /// Without that margin the motif can seal off unreserved pockets of the grid.
    pub fn fits(&self, dimensions: &GridDimensions) -> bool {
        dimensions.width().0 >= self.width + 2 && dimensions.height().0 >= self.height + 2
    }

    /// (row, column) translation that centres the motif on the grid.
    pub fn centring_offset(&self, dimensions: &GridDimensions) -> (isize, isize) {
        let row_offset = (dimensions.height().0 / 2) as isize - (self.height / 2) as isize;
        let column_offset = (dimensions.width().0 / 2) as isize - (self.width / 2) as isize;
        (row_offset, column_offset)
    }

    /// Translate the motif to absolute grid cells, dropping any that fall outside the grid.
    ///
    /// A motif that does not `fit` is not placed at all and the returned mask is empty.
    pub fn overlay(&self, dimensions: &GridDimensions) -> MotifMask {
        let mut mask = MotifMask::empty(*dimensions);
        if !self.fits(dimensions) {
            warn!("{}x{} grid is too small for the {}x{} motif, carving without it",
                  dimensions.width().0,
                  dimensions.height().0,
                  self.width,
                  self.height);
            return mask;
        }

        let (row_offset, column_offset) = self.centring_offset(dimensions);
        for &(dr, dc) in &self.offsets {
            let row = row_offset + dr as isize;
            let column = column_offset + dc as isize;
            if row < 0 || column < 0 {
                continue;
            }
            let coord = GridCoordinate::new(row as usize, column as usize);
            if let Some(index) = dimensions.grid_coordinate_to_index(coord) {
                mask.cells.insert(index);
            }
        }
        debug!("motif reserves {} cells", mask.len());
        mask
    }
}

/// The set of grid cells excluded from random carving.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MotifMask {
    cells: BitSet,
    dimensions: GridDimensions,
}

impl MotifMask {
    pub fn empty(dimensions: GridDimensions) -> MotifMask {
        MotifMask {
            cells: BitSet::with_capacity(dimensions.size().0),
            dimensions,
        }
    }

    /// Is the given coordinate reserved?
    ///
    /// A coordinate outside the grid is never reserved.
    pub fn is_masked(&self, coord: GridCoordinate) -> bool {
        self.dimensions
            .grid_coordinate_to_index(coord)
            .map_or(false, |index| self.cells.contains(index))
    }

    /// Reserve every free cell that cannot be reached from `from` without crossing a reserved cell.
    ///
    /// A motif that encloses free cells leaves pockets the generator never enters. Folding them
    /// into the mask keeps the free cells connected. Returns the number of cells added.
    pub fn reserve_enclosed(&mut self, from: GridCoordinate) -> usize {
        let from_index = match self.dimensions.grid_coordinate_to_index(from) {
            Some(index) if !self.cells.contains(index) => index,
            _ => return 0,
        };

        let size = self.dimensions.size().0;
        let mut reached = BitSet::with_capacity(size);
        reached.insert(from_index);
        let mut stack = vec![from];
        while let Some(coord) = stack.pop() {
            for &dir in &CANONICAL_DIRECTIONS {
                let next_index = coord.offset(dir)
                                      .and_then(|next| self.dimensions.grid_coordinate_to_index(next));
                if let Some(index) = next_index {
                    if !self.cells.contains(index) && reached.insert(index) {
                        stack.push(self.dimensions.coordinate_from_row_major_index(index));
                    }
                }
            }
        }

        let enclosed: Vec<usize> = (0..size)
            .filter(|index| !self.cells.contains(*index) && !reached.contains(*index))
            .collect();
        for &index in &enclosed {
            self.cells.insert(index);
        }
        enclosed.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reserved coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        self.cells.iter().map(move |index| self.dimensions.coordinate_from_row_major_index(index))
    }

    pub fn count_unmasked(&self) -> usize {
        self.dimensions.size().0 - self.len()
    }

    pub fn first_unmasked_coordinate(&self) -> Option<GridCoordinate> {
        (0..self.dimensions.size().0)
            .find(|index| !self.cells.contains(*index))
            .map(|index| self.dimensions.coordinate_from_row_major_index(index))
    }

    /// Pre-mark every reserved cell in a generator's visited set.
    pub fn mark_visited(&self, visited: &mut BitSet) {
        visited.union_with(&self.cells);
    }

    /// Resolve the reserved cells after carving according to `policy`.
    pub fn apply_policy(&self, grid: &mut Grid, policy: MotifPolicy) -> Result<()> {
        if policy == MotifPolicy::Blocked {
            return Ok(());
        }

        let mut opened = 0;
        for coord in self.iter() {
            for &dir in &[CompassPrimary::East, CompassPrimary::South] {
                let both_reserved = grid.neighbour_at_direction(coord, dir)
                                        .map_or(false, |neighbour| self.is_masked(neighbour));
                if both_reserved {
                    grid.clear_wall(coord, dir)?;
                    opened += 1;
                }
            }
        }
        debug!("opened {} walls inside the motif", opened);
        Ok(())
    }
}
