//! One maze generation run, from validated parameters to a carved grid and its solution.

use error_chain::bail;
use log::{info, warn};

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::generators;
use crate::grid::Grid;
use crate::grid_dimensions::GridDimensions;
use crate::masks::{Motif, MotifMask, MotifPolicy};
use crate::maze_file::MazeFile;
use crate::pathing::{self, SolutionPath};
use crate::units::{Height, Width};

/// Everything that determines a generated maze. Identical parameters give identical mazes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MazeParameters {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub entry: GridCoordinate,
    pub exit: GridCoordinate,
    pub motif: Option<Motif>,
    pub motif_policy: MotifPolicy,
}

impl MazeParameters {
    /// Entry in the top left corner, exit in the bottom right, with the "42" motif blocked out.
    pub fn new(width: usize, height: usize, seed: u64) -> MazeParameters {
        MazeParameters {
            width,
            height,
            seed,
            entry: GridCoordinate::new(0, 0),
            exit: GridCoordinate::new(height.saturating_sub(1), width.saturating_sub(1)),
            motif: Some(Motif::forty_two()),
            motif_policy: MotifPolicy::default(),
        }
    }

    /// Check dimensions and endpoints before anything is built.
    pub fn validate(&self) -> Result<GridDimensions> {
        let dimensions = GridDimensions::new(Width(self.width), Height(self.height))?;
        dimensions.check_coordinate(self.entry)?;
        dimensions.check_coordinate(self.exit)?;
        if self.entry == self.exit {
            bail!(ErrorKind::CoincidentEndpoints(self.entry));
        }
        Ok(dimensions)
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    entry: GridCoordinate,
    exit: GridCoordinate,
    reserved: MotifMask,
    seed: u64,
    entry_opening: Option<CompassPrimary>,
    exit_opening: Option<CompassPrimary>,
}

impl Maze {
    /// Carve a perfect maze.
    ///
    /// The motif cells, along with any free cells the motif walls off from the entry, are marked
    /// visited before carving so the backtracker grows around them,
    /// the walk starts at the entry, then both endpoints are opened to the outside if they sit on
    /// the boundary and finally the motif policy is applied.
    pub fn generate(params: &MazeParameters) -> Result<Maze> {
        let dimensions = params.validate()?;
        let mut grid = Grid::from_dimensions(dimensions);
        let mut visited = generators::visited_set(&grid);

        let mut reserved = match params.motif {
            Some(ref motif) => {
                let mask = motif.overlay(&dimensions);
                if mask.is_masked(params.entry) {
                    warn!("entry {} lies inside the motif, carving without it", params.entry);
                    MotifMask::empty(dimensions)
                } else {
                    mask
                }
            }
            None => MotifMask::empty(dimensions),
        };
        let enclosed = reserved.reserve_enclosed(params.entry);
        if enclosed > 0 {
            warn!("motif encloses {} cells unreachable from the entry, reserving them too", enclosed);
        }
        reserved.mark_visited(&mut visited);

        let mut rng = generators::seeded_rng(params.seed);
        generators::recursive_backtracker(&mut grid, &mut visited, params.entry, &mut rng)?;

        let entry_opening = generators::open_boundary(&mut grid, params.entry)?;
        let exit_opening = generators::open_boundary(&mut grid, params.exit)?;
        reserved.apply_policy(&mut grid, params.motif_policy)?;

        info!("generated {}x{} maze with seed {} ({} cells reserved, motif {})",
              params.width,
              params.height,
              params.seed,
              reserved.len(),
              params.motif_policy);

        Ok(Maze {
            grid,
            entry: params.entry,
            exit: params.exit,
            reserved,
            seed: params.seed,
            entry_opening,
            exit_opening,
        })
    }

    /// Shortest route from entry to exit.
    pub fn solve(&self) -> Result<SolutionPath> {
        let path = pathing::solve(&self.grid, self.entry, self.exit)?;
        info!("solution from {} to {} takes {} moves", self.entry, self.exit, path.len());
        Ok(path)
    }

    /// Solve the maze and bundle everything the maze file records.
    pub fn to_maze_file(&self) -> Result<MazeFile> {
        let solution = self.solve()?;
        Ok(MazeFile::new(self.grid.clone(), self.entry, self.exit, solution))
    }

    pub fn is_perfect(&self) -> bool {
        generators::is_perfect(&self.grid, &self.reserved)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn entry(&self) -> GridCoordinate {
        self.entry
    }

    #[inline]
    pub fn exit(&self) -> GridCoordinate {
        self.exit
    }

    #[inline]
    pub fn reserved(&self) -> &MotifMask {
        &self.reserved
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Outward wall cleared at the entry, None for an interior entry.
    pub fn entry_opening(&self) -> Option<CompassPrimary> {
        self.entry_opening
    }

    pub fn exit_opening(&self) -> Option<CompassPrimary> {
        self.exit_opening
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::WallMask;
    use crate::pathing::Distances;

    fn gc(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate::new(row, column)
    }

    fn generation_error(params: &MazeParameters) -> Error {
        Maze::generate(params).unwrap_err()
    }

    #[test]
    fn smallest_maze_is_solved_along_the_tree() {
        let maze = Maze::generate(&MazeParameters::new(7, 5, 1)).unwrap();
        assert!(maze.reserved().is_empty());
        assert!(maze.is_perfect());

        let path = maze.solve().unwrap();
        assert!(!path.is_empty());
        let distances = Distances::for_grid(maze.grid(), gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(gc(4, 6)), Some(path.len() as u32));
        assert!(path.is_walkable(maze.grid(), gc(0, 0)));
    }

    #[test]
    fn same_parameters_same_maze() {
        let params = MazeParameters::new(21, 15, 1234);
        let a = Maze::generate(&params).unwrap();
        let b = Maze::generate(&params).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.solve().unwrap(), b.solve().unwrap());
    }

    #[test]
    fn different_seed_different_maze() {
        let a = Maze::generate(&MazeParameters::new(7, 5, 1)).unwrap();
        let b = Maze::generate(&MazeParameters::new(7, 5, 2)).unwrap();
        assert_ne!(a.grid(), b.grid());
    }

    #[test]
    fn endpoints_open_to_the_outside() {
        let maze = Maze::generate(&MazeParameters::new(7, 5, 1)).unwrap();
        assert_eq!(maze.entry_opening(), Some(CompassPrimary::North));
        assert_eq!(maze.exit_opening(), Some(CompassPrimary::South));
        assert!(!maze.grid().has_wall(gc(0, 0), CompassPrimary::North));
        assert!(maze.grid().has_wall(gc(0, 0), CompassPrimary::West));
        assert!(!maze.grid().has_wall(gc(4, 6), CompassPrimary::South));
        assert!(maze.grid().has_wall(gc(4, 6), CompassPrimary::East));

        let mut params = MazeParameters::new(9, 7, 5);
        params.entry = gc(3, 0);
        params.exit = gc(3, 4);
        let maze = Maze::generate(&params).unwrap();
        assert_eq!(maze.entry_opening(), Some(CompassPrimary::West));
        assert_eq!(maze.exit_opening(), None);
    }

    #[test]
    fn invalid_parameters() {
        match *generation_error(&MazeParameters::new(6, 5, 1)).kind() {
            ErrorKind::InvalidDimension(6, 5) => {}
            ref other => panic!("unexpected error {:?}", other),
        }

        let mut params = MazeParameters::new(7, 5, 1);
        params.exit = gc(5, 6);
        match *generation_error(&params).kind() {
            ErrorKind::OutOfBounds(coord, 7, 5) => assert_eq!(coord, gc(5, 6)),
            ref other => panic!("unexpected error {:?}", other),
        }

        let mut params = MazeParameters::new(7, 5, 1);
        params.exit = gc(0, 0);
        match *generation_error(&params).kind() {
            ErrorKind::CoincidentEndpoints(coord) => assert_eq!(coord, gc(0, 0)),
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn motif_is_walled_off() {
        let maze = Maze::generate(&MazeParameters::new(11, 9, 77)).unwrap();
        assert_eq!(maze.reserved().len(), 20);
        for coord in maze.reserved().iter() {
            assert_eq!(maze.grid().wall_mask(coord), Some(WallMask::CLOSED));
        }
        assert!(maze.is_perfect());
        assert!(maze.solve().is_ok());
    }

    #[test]
    fn exit_inside_blocked_motif_is_unreachable() {
        let mut params = MazeParameters::new(11, 9, 3);
        params.exit = gc(2, 2);
        let maze = Maze::generate(&params).unwrap();
        assert!(maze.reserved().is_masked(gc(2, 2)));
        let err = maze.solve().unwrap_err();
        match *err.kind() {
            ErrorKind::Unreachable(start, end) => {
                assert_eq!(start, gc(0, 0));
                assert_eq!(end, gc(2, 2));
            }
            ref other => panic!("unexpected error {:?}", other),
        }
        assert!(maze.to_maze_file().is_err());
    }

    #[test]
    fn entry_inside_motif_drops_the_motif() {
        let mut params = MazeParameters::new(11, 9, 3);
        params.entry = gc(2, 2);
        let maze = Maze::generate(&params).unwrap();
        assert!(maze.reserved().is_empty());
        assert_eq!(maze.entry_opening(), None);
        assert!(maze.is_perfect());
    }

    #[test]
    fn cells_enclosed_by_the_motif_are_reserved() {
        let mut params = MazeParameters::new(11, 9, 3);
        params.motif = Some(Motif::from_pattern("#####\n#...#\n#####").unwrap());
        params.exit = gc(4, 4);
        let maze = Maze::generate(&params).unwrap();

        assert_eq!(maze.reserved().len(), 15);
        assert!(maze.reserved().is_masked(gc(4, 4)));
        assert!(maze.is_perfect());
        assert_eq!(maze.grid().links_count(), 99 - 15 - 1);
        match *maze.solve().unwrap_err().kind() {
            ErrorKind::Unreachable(_, end) => assert_eq!(end, gc(4, 4)),
            ref other => panic!("unexpected error {:?}", other),
        }

        params.exit = gc(8, 10);
        let maze = Maze::generate(&params).unwrap();
        assert!(maze.is_perfect());
        assert!(maze.solve().is_ok());
    }

    #[test]
    fn opened_motif_stays_sealed() {
        let mut params = MazeParameters::new(11, 9, 3);
        params.motif_policy = MotifPolicy::Opened;
        let maze = Maze::generate(&params).unwrap();

        assert!(maze.is_perfect());
        assert_eq!(maze.grid().asymmetric_wall(), None);
        // the left bar of the "4"
        assert!(maze.grid().is_neighbour_linked(gc(2, 2), CompassPrimary::South));
        for coord in maze.reserved().iter() {
            for neighbour in maze.grid().links(coord).unwrap() {
                assert!(maze.reserved().is_masked(neighbour));
            }
        }
        assert!(maze.solve().is_ok());
    }

    #[test]
    fn small_grid_skips_the_motif() {
        let maze = Maze::generate(&MazeParameters::new(8, 6, 1)).unwrap();
        assert!(maze.reserved().is_empty());
        assert_eq!(maze.grid().links_count(), 47);
    }

    #[test]
    fn perfect_and_solvable_for_any_parameters() {
        fn p(w: u8, h: u8, seed: u64, opened: bool, r: u8, c: u8) -> TestResult {
            let width = 7 + (w % 20) as usize;
            let height = 5 + (h % 20) as usize;
            let mut params = MazeParameters::new(width, height, seed);
            params.exit = gc(r as usize % height, c as usize % width);
            if params.exit == params.entry {
                return TestResult::discard();
            }
            if opened {
                params.motif_policy = MotifPolicy::Opened;
            }
            let maze = match Maze::generate(&params) {
                Ok(maze) => maze,
                Err(_) => return TestResult::failed(),
            };
            if maze.reserved().is_masked(params.exit) {
                return TestResult::from_bool(maze.solve().is_err());
            }
            let solvable = maze.solve().map(|path| path.is_walkable(maze.grid(), params.entry));
            TestResult::from_bool(maze.is_perfect() && maze.grid().asymmetric_wall().is_none() &&
                                  solvable.unwrap_or(false))
        }
        quickcheck(p as fn(u8, u8, u64, bool, u8, u8) -> TestResult);
    }
}
