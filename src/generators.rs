use bit_set::BitSet;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::cells::{CANONICAL_DIRECTIONS, CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::masks::MotifMask;
use crate::pathing::Distances;

/// The random source for one carving pass. Same seed, same maze.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// An empty visited set sized for the grid, indexed row-major.
pub fn visited_set(grid: &Grid) -> BitSet {
    BitSet::with_capacity(grid.size())
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// A depth first walk from `entry` that knocks down the wall to a random unvisited neighbour,
/// moving on to it, and backtracks along its own trail when it reaches a dead end. Cells already
/// in `visited` (e.g. a reserved motif) are never entered. When the trail is empty every cell
/// reachable from `entry` without crossing a visited cell belongs to one spanning tree.
///
/// The walk uses an explicit stack rather than recursion so large grids cannot blow the call stack.
/// Candidate neighbours are always collected in N, E, S, W order before drawing from `rng`.
pub fn recursive_backtracker(grid: &mut Grid,
                             visited: &mut BitSet,
                             entry: GridCoordinate,
                             rng: &mut XorShiftRng)
                             -> Result<()> {
    let entry_index = grid.grid_coordinate_to_index(entry)
                          .ok_or_else(|| ErrorKind::OutOfBounds(entry, grid.width().0, grid.height().0))?;

    let mut stack = Vec::with_capacity(grid.size());
    stack.push(entry);
    visited.insert(entry_index);
    let mut carved = 0;

    while let Some(&current) = stack.last() {

        let unvisited_neighbours = unvisited_neighbours(grid, visited, current);

        if unvisited_neighbours.is_empty() {
            // Dead end, backtrack
            stack.pop();
        } else {
            let (dir, next) = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            grid.clear_wall(current, dir)?;
            if let Some(index) = grid.grid_coordinate_to_index(next) {
                visited.insert(index);
            }
            stack.push(next);
            carved += 1;
        }
    }

    debug!("recursive backtracker carved {} passages from {}", carved, entry);
    Ok(())
}

fn unvisited_neighbours(grid: &Grid,
                        visited: &BitSet,
                        coord: GridCoordinate)
                        -> SmallVec<[(CompassPrimary, GridCoordinate); 4]> {
    CANONICAL_DIRECTIONS.iter()
                        .filter_map(|dir| grid.neighbour_at_direction(coord, *dir).map(|n| (*dir, n)))
                        .filter(|&(_, neighbour)| {
                            grid.grid_coordinate_to_index(neighbour)
                                .map_or(false, |index| !visited.contains(index))
                        })
                        .collect()
}

/// The outward facing side of a boundary cell, if it has one.
///
/// Corner cells have two outward sides; north and south win over west and east.
pub fn outward_direction(grid: &Grid, coord: GridCoordinate) -> Option<CompassPrimary> {
    if !grid.dimensions().is_on_boundary(coord) {
        None
    } else if coord.row == 0 {
        Some(CompassPrimary::North)
    } else if coord.row == grid.height().0 - 1 {
        Some(CompassPrimary::South)
    } else if coord.column == 0 {
        Some(CompassPrimary::West)
    } else {
        Some(CompassPrimary::East)
    }
}

/// Open a boundary cell to the outside of the maze.
///
/// Exactly one outward wall is cleared, even for a corner cell. A cell on row 0 opens north, on
/// the last row south, otherwise on column 0 west and on the last column east. So the top left
/// corner opens north and the bottom right corner opens south.
///
/// Returns the direction of the opening, or None if the cell is not on the grid edge.
pub fn open_boundary(grid: &mut Grid, coord: GridCoordinate) -> Result<Option<CompassPrimary>> {
    match outward_direction(grid, coord) {
        Some(dir) => {
            grid.clear_wall(coord, dir)?;
            Ok(Some(dir))
        }
        None => Ok(None),
    }
}

/// Is the carved grid a perfect maze over the cells not reserved by `mask`?
///
/// Counts the passages between unreserved cells, which must be exactly one fewer than the number
/// of those cells, and checks every unreserved cell can be reached from every other.
pub fn is_perfect(grid: &Grid, mask: &MotifMask) -> bool {
    let free_cells = mask.count_unmasked();
    let free_links: usize = grid.iter()
        .filter(|coord| !mask.is_masked(*coord))
        .map(|coord| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter_map(|dir| {
                    if grid.is_neighbour_linked(coord, *dir) {
                        grid.neighbour_at_direction(coord, *dir)
                    } else {
                        None
                    }
                })
                .filter(|neighbour| !mask.is_masked(*neighbour))
                .count()
        })
        .sum();

    if free_cells == 0 || free_links + 1 != free_cells {
        return false;
    }

    mask.first_unmasked_coordinate()
        .and_then(|start| Distances::for_grid(grid, start))
        .map_or(false, |distances| {
            grid.iter()
                .filter(|coord| !mask.is_masked(*coord))
                .all(|coord| distances.distance_from_start_to(coord).is_some())
        })
}
