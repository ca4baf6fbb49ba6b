use std::fmt;

use error_chain::bail;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::cells::{CANONICAL_DIRECTIONS, CompassPrimary, GridCoordinate, WallMask};
use crate::errors::*;
use crate::grid_dimensions::GridDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{Height, Width};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// A rectangular maze stored as one wall mask per cell.
///
/// Invariant: a wall shared by two cells is either present on both sides or cleared on both.
/// Only the outward walls of boundary cells have no partner.
#[derive(Clone, Eq, PartialEq)]
pub struct Grid {
    dimensions: GridDimensions,
    walls: Vec<WallMask>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, links: {:?}",
               self.width(), self.height(), self.links_count())
    }
}

impl Grid {
    /// A fully walled grid. Fails with `InvalidDimension` below the minimum size.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let dimensions = GridDimensions::new(width, height)?;
        Ok(Grid::from_dimensions(dimensions))
    }

    pub fn from_dimensions(dimensions: GridDimensions) -> Grid {
        Grid {
            dimensions,
            walls: vec![WallMask::CLOSED; dimensions.size().0],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.dimensions.width()
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.dimensions.height()
    }

    #[inline]
    pub fn in_bounds(&self, coord: GridCoordinate) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        self.dimensions.grid_coordinate_to_index(coord)
    }

    pub fn wall_mask(&self, coord: GridCoordinate) -> Option<WallMask> {
        self.grid_coordinate_to_index(coord).map(|index| self.walls[index])
    }

    /// Is there a wall on the `direction` side of the cell?
    ///
    /// Cells outside the grid are solid, so this is true for an invalid coordinate.
    pub fn has_wall(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.wall_mask(coord).map_or(true, |mask| mask.has_wall(direction))
    }

    /// Knock down the wall on the `direction` side of a cell.
    ///
    /// The matching wall of the neighbouring cell is cleared too. On the grid boundary there is
    /// no neighbour and only the outward wall is cleared, opening the maze to the outside.
    pub fn clear_wall(&mut self, coord: GridCoordinate, direction: CompassPrimary) -> Result<()> {
        let index = self.grid_coordinate_to_index(coord)
                        .ok_or_else(|| self.out_of_bounds(coord))?;
        self.walls[index].clear(direction);

        if let Some(neighbour) = self.neighbour_at_direction(coord, direction) {
            let neighbour_index = self.grid_coordinate_to_index(neighbour)
                                      .expect("neighbour_at_direction gives valid coordinates");
            self.walls[neighbour_index].clear(direction.opposite());
        }
        Ok(())
    }

    /// The adjacent cell in `direction`, if it lies within the grid.
    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        coord.offset(direction).filter(|neighbour| self.in_bounds(*neighbour))
    }

    /// Cells to the North, East, South or West of a cell (in that order), but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CANONICAL_DIRECTIONS.iter()
                            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                            .collect()
    }

    /// Is the neighbour in `direction` reachable through an open wall?
    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        !self.has_wall(coord, direction) && self.neighbour_at_direction(coord, direction).is_some()
    }

    /// Cells linked to a cell by a passage, in canonical direction order.
    /// None for an invalid coordinate.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.wall_mask(coord).map(|mask| {
            mask.open_directions()
                .iter()
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Number of cleared walls between pairs of cells. Boundary openings do not count.
    pub fn links_count(&self) -> usize {
        self.iter()
            .map(|coord| {
                [CompassPrimary::East, CompassPrimary::South]
                    .iter()
                    .filter(|dir| self.is_neighbour_linked(coord, **dir))
                    .count()
            })
            .sum()
    }

    /// The first shared wall that is open on one side only, if any.
    pub fn asymmetric_wall(&self) -> Option<(GridCoordinate, CompassPrimary)> {
        self.iter()
            .flat_map(|coord| {
                [CompassPrimary::East, CompassPrimary::South]
                    .iter()
                    .map(move |dir| (coord, *dir))
                    .collect::<SmallVec<[_; 2]>>()
            })
            .find(|&(coord, dir)| {
                self.neighbour_at_direction(coord, dir).map_or(false, |neighbour| {
                    self.has_wall(coord, dir) != self.has_wall(neighbour, dir.opposite())
                })
            })
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.dimensions)
    }

    /// One string per row, one upper case hex digit per cell.
    pub fn to_hex_rows(&self) -> Vec<String> {
        self.iter_row()
            .map(|row| {
                row.into_iter()
                   .filter_map(|coord| self.wall_mask(coord))
                   .map(WallMask::to_hex_digit)
                   .collect::<String>()
            })
            .collect()
    }

    /// Rebuild a grid from hex rows as produced by `to_hex_rows`.
    ///
    /// Rows must all be the same length, digits are case insensitive and shared walls must agree
    /// on both sides.
    pub fn from_hex_rows<S: AsRef<str>>(rows: &[S]) -> Result<Grid> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let dimensions = GridDimensions::new(Width(width), Height(height))?;

        let mut walls = Vec::with_capacity(dimensions.size().0);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                bail!(ErrorKind::MalformedMazeFile(format!("row {} has {} cells, expected {}",
                                                           row_index,
                                                           row.chars().count(),
                                                           width)));
            }
            for (column, c) in row.chars().enumerate() {
                let mask = WallMask::from_hex_digit(c).ok_or_else(|| {
                    ErrorKind::MalformedMazeFile(format!("invalid wall digit {:?} at {},{}",
                                                         c, row_index, column))
                })?;
                walls.push(mask);
            }
        }

        let grid = Grid { dimensions, walls };
        if let Some((coord, dir)) = grid.asymmetric_wall() {
            bail!(ErrorKind::MalformedMazeFile(format!("wall {:?} of cell {} is one sided",
                                                       dir, coord)));
        }
        Ok(grid)
    }

    fn out_of_bounds(&self, coord: GridCoordinate) -> Error {
        ErrorKind::OutOfBounds(coord, self.width().0, self.height().0).into()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex_rows().iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};

    use super::*;

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("grid dimensions too small")
    }

    fn gc(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate::new(row, column)
    }

    #[test]
    fn new_grid_is_fully_walled() {
        let g = grid(7, 5);
        assert_eq!(g.size(), 35);
        for coord in g.iter() {
            assert_eq!(g.wall_mask(coord), Some(WallMask::CLOSED));
        }
        assert_eq!(g.links_count(), 0);
        assert!(g.to_hex_rows().iter().all(|row| row == "FFFFFFF"));
    }

    #[test]
    fn too_small_grid_is_rejected() {
        let err = Grid::new(Width(6), Height(5)).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidDimension(6, 5) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn neighbour_cells() {
        let g = grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let neighbours: Vec<GridCoordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(0, 1), gc(1, 0)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(8, 9), &[gc(7, 9), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_are_in_canonical_order() {
        let g = grid(7, 5);
        assert_eq!(&*g.neighbours(gc(2, 3)), &[gc(1, 3), gc(2, 4), gc(3, 3), gc(2, 2)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = grid(7, 5);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, None);
        check_neighbour(gc(0, 0), CompassPrimary::South, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(4, 6), CompassPrimary::North, Some(gc(3, 6)));
        check_neighbour(gc(4, 6), CompassPrimary::South, None);
        check_neighbour(gc(4, 6), CompassPrimary::East, None);
        check_neighbour(gc(4, 6), CompassPrimary::West, Some(gc(4, 5)));
    }

    #[test]
    fn clearing_walls_is_symmetric() {
        let mut g = grid(7, 5);
        let a = gc(1, 1);
        let b = gc(1, 2);
        let c = gc(2, 2);

        g.clear_wall(a, CompassPrimary::East).expect("clear failed");
        assert!(!g.has_wall(a, CompassPrimary::East));
        assert!(!g.has_wall(b, CompassPrimary::West));
        assert!(g.is_neighbour_linked(a, CompassPrimary::East));
        assert!(g.is_neighbour_linked(b, CompassPrimary::West));
        assert_eq!(g.wall_mask(a).map(WallMask::bits), Some(13));
        assert_eq!(g.wall_mask(b).map(WallMask::bits), Some(7));

        g.clear_wall(c, CompassPrimary::North).expect("clear failed");
        assert_eq!(&*g.links(b).unwrap(), &[c, a]);
        assert_eq!(&*g.links(a).unwrap(), &[b]);
        assert_eq!(&*g.links(c).unwrap(), &[b]);
        assert_eq!(g.links_count(), 2);
        assert_eq!(g.asymmetric_wall(), None);
    }

    #[test]
    fn clearing_a_boundary_wall_opens_only_that_cell() {
        let mut g = grid(7, 5);
        g.clear_wall(gc(0, 0), CompassPrimary::North).expect("clear failed");
        assert!(!g.has_wall(gc(0, 0), CompassPrimary::North));
        assert!(!g.is_neighbour_linked(gc(0, 0), CompassPrimary::North));
        assert_eq!(g.links_count(), 0);
        assert_eq!(g.wall_mask(gc(0, 0)).map(WallMask::bits), Some(14));
        assert_eq!(g.asymmetric_wall(), None);
    }

    #[test]
    fn clearing_out_of_bounds_fails() {
        let mut g = grid(7, 5);
        let before = g.clone();
        let err = g.clear_wall(gc(5, 0), CompassPrimary::North).unwrap_err();
        match *err.kind() {
            ErrorKind::OutOfBounds(coord, 7, 5) => assert_eq!(coord, gc(5, 0)),
            ref other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(g, before);
        assert!(g.has_wall(gc(5, 0), CompassPrimary::South));
        assert_eq!(g.links(gc(5, 0)), None);
    }

    #[test]
    fn hex_rows() {
        let mut g = grid(7, 5);
        g.clear_wall(gc(0, 0), CompassPrimary::East).unwrap();
        g.clear_wall(gc(0, 0), CompassPrimary::South).unwrap();
        let rows = g.to_hex_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], "97FFFFF");
        assert_eq!(rows[1], "EFFFFFF");
        assert_eq!(g.to_string().lines().count(), 5);
    }

    #[test]
    fn hex_rows_parse_errors() {
        let ragged = ["FFFFFFF", "FFFFFF", "FFFFFFF", "FFFFFFF", "FFFFFFF"];
        assert!(Grid::from_hex_rows(&ragged[..]).is_err());

        let bad_digit = ["FFFFFFF", "FFFXFFF", "FFFFFFF", "FFFFFFF", "FFFFFFF"];
        assert!(Grid::from_hex_rows(&bad_digit[..]).is_err());

        // 0xD opens east on (0,0) but (0,1) still has its west wall
        let one_sided = ["DFFFFFF", "FFFFFFF", "FFFFFFF", "FFFFFFF", "FFFFFFF"];
        match *Grid::from_hex_rows(&one_sided[..]).unwrap_err().kind() {
            ErrorKind::MalformedMazeFile(_) => {}
            ref other => panic!("unexpected error {:?}", other),
        }

        let too_small = ["FFFFFFF", "FFFFFFF"];
        match *Grid::from_hex_rows(&too_small[..]).unwrap_err().kind() {
            ErrorKind::InvalidDimension(7, 2) => {}
            ref other => panic!("unexpected error {:?}", other),
        }

        let lower_case = ["97ffffe", "efffffd", "fffffff", "fffffff", "fffffff"];
        let parsed = Grid::from_hex_rows(&lower_case[..]).expect("lower case digits are valid");
        assert_eq!(parsed.to_hex_rows()[0], "97FFFFE");
    }

    #[test]
    fn hex_round_trip_of_arbitrary_wall_clearing() {
        fn p(w: u8, h: u8, clears: Vec<(u8, u8, u8)>) -> TestResult {
            let width = 7 + (w % 10) as usize;
            let height = 5 + (h % 10) as usize;
            let mut g = grid(width, height);
            for (r, c, d) in clears {
                let coord = gc(r as usize % height, c as usize % width);
                let dir = CANONICAL_DIRECTIONS[d as usize % 4];
                if g.clear_wall(coord, dir).is_err() {
                    return TestResult::failed();
                }
            }
            if g.asymmetric_wall().is_some() {
                return TestResult::failed();
            }
            let parsed = match Grid::from_hex_rows(&g.to_hex_rows()[..]) {
                Ok(parsed) => parsed,
                Err(_) => return TestResult::failed(),
            };
            TestResult::from_bool(parsed == g)
        }
        quickcheck(p as fn(u8, u8, Vec<(u8, u8, u8)>) -> TestResult);
    }
}
