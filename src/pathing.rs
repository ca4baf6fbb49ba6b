use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use error_chain::bail;
use log::debug;
use smallvec::SmallVec;

use crate::cells::{CANONICAL_DIRECTIONS, CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::grid_dimensions::GridDimensions;

/// A route through the maze as a sequence of single cell moves.
///
/// An empty path is a route from a cell to itself.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SolutionPath {
    moves: Vec<CompassPrimary>,
}

impl SolutionPath {
    pub fn new(moves: Vec<CompassPrimary>) -> SolutionPath {
        SolutionPath { moves }
    }

    #[inline]
    pub fn moves(&self) -> &[CompassPrimary] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Walk the moves from `start`, returning every cell visited including `start`.
    ///
    /// None if a move steps off the grid.
    pub fn cells(&self, start: GridCoordinate, dimensions: &GridDimensions) -> Option<Vec<GridCoordinate>> {
        if !dimensions.is_valid_coordinate(start) {
            return None;
        }
        let mut cells = Vec::with_capacity(self.moves.len() + 1);
        cells.push(start);
        let mut current = start;
        for dir in &self.moves {
            current = current.offset(*dir).filter(|c| dimensions.is_valid_coordinate(*c))?;
            cells.push(current);
        }
        Some(cells)
    }

    /// Does every move of the path pass through an open wall of `grid`?
    pub fn is_walkable(&self, grid: &Grid, start: GridCoordinate) -> bool {
        let mut current = start;
        for dir in &self.moves {
            if !grid.is_neighbour_linked(current, *dir) {
                return false;
            }
            match grid.neighbour_at_direction(current, *dir) {
                Some(next) => current = next,
                None => return false,
            }
        }
        grid.in_bounds(current)
    }
}

impl fmt::Display for SolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text: String = self.moves.iter().map(|dir| dir.as_char()).collect();
        write!(f, "{}", text)
    }
}

impl FromStr for SolutionPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<SolutionPath> {
        let moves = s.trim()
                     .chars()
                     .enumerate()
                     .map(|(i, c)| {
                         CompassPrimary::from_char(c).ok_or_else(|| {
                             Error::from(ErrorKind::MalformedMazeFile(
                                 format!("invalid direction {:?} at position {} of the solution", c, i)))
                         })
                     })
                     .collect::<Result<Vec<_>>>()?;
        Ok(SolutionPath { moves })
    }
}

/// Shortest route from `start` to `end`, moving only through cleared walls.
///
/// Breadth first search expanding neighbours in N, E, S, W order. Each cell remembers the move
/// that first reached it, and the route is read back from `end` once it is dequeued. On a perfect
/// maze there is exactly one simple route so the result is that route.
///
/// Fails with `OutOfBounds` for an invalid endpoint and `Unreachable` if the search runs dry.
pub fn solve(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<SolutionPath> {
    let dims = grid.dimensions();
    dims.check_coordinate(start)?;
    dims.check_coordinate(end)?;

    let mut arrived_by: Vec<Option<CompassPrimary>> = vec![None; grid.size()];
    let mut visited = vec![false; grid.size()];
    let mut queue = VecDeque::new();

    visited[index_of(dims, start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            let path = read_back_path(dims, &arrived_by, start, end);
            debug!("solved {} -> {} in {} moves", start, end, path.len());
            return Ok(path);
        }

        for &dir in &CANONICAL_DIRECTIONS {
            if !grid.is_neighbour_linked(current, dir) {
                continue;
            }
            if let Some(next) = grid.neighbour_at_direction(current, dir) {
                let next_index = index_of(dims, next);
                if !visited[next_index] {
                    visited[next_index] = true;
                    arrived_by[next_index] = Some(dir);
                    queue.push_back(next);
                }
            }
        }
    }

    bail!(ErrorKind::Unreachable(start, end))
}

fn index_of(dims: &GridDimensions, coord: GridCoordinate) -> usize {
    dims.grid_coordinate_to_index(coord)
        .expect("search only visits valid coordinates")
}

fn read_back_path(dims: &GridDimensions,
                  arrived_by: &[Option<CompassPrimary>],
                  start: GridCoordinate,
                  end: GridCoordinate)
                  -> SolutionPath {
    let mut moves = vec![];
    let mut current = end;
    while current != start {
        let dir = match arrived_by[index_of(dims, current)] {
            Some(dir) => dir,
            None => break,
        };
        moves.push(dir);
        current = match current.offset(dir.opposite()) {
            Some(previous) => previous,
            None => break,
        };
    }
    moves.reverse();
    SolutionPath { moves }
}

/// Flood fill step counts from one cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    dimensions: GridDimensions,
    distances: Vec<Option<u32>>,
    max_distance: u32,
}

impl Distances {
    /// None if `start_coordinate` is not on the grid.
    pub fn for_grid(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        let start_index = grid.grid_coordinate_to_index(start_coordinate)?;

        let mut max = 0;
        let mut distances = vec![None; grid.size()];
        distances[start_index] = Some(0);

        // Every link is one step so the first time a cell is reached is also its shortest
        // distance. The distances vec doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = grid.grid_coordinate_to_index(*cell_coord)
                                           .and_then(|index| distances[index])
                                           .unwrap_or(0);
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord).unwrap_or_else(SmallVec::new);
                for link_coordinate in &links {
                    if let Some(index) = grid.grid_coordinate_to_index(*link_coordinate) {
                        if distances[index].is_none() {
                            distances[index] = Some(distance_to_cell + 1);
                            new_frontier.push(*link_coordinate);
                        }
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            dimensions: *grid.dimensions(),
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.dimensions
            .grid_coordinate_to_index(coord)
            .and_then(|index| self.distances[index])
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, distance)| *distance == Some(furthest_distance))
            .map(|(index, _)| self.dimensions.coordinate_from_row_major_index(index))
            .collect()
    }
}
