//! The text file a generated maze is saved as.
//!
//! ```text
//! C555553
//! FFFFFFA
//! FFFFFFA
//! FFFFFFA
//! FFFFFFA
//!
//! 0,0
//! 4,6
//! EEEEEESSSS
//! ```
//!
//! One upper case hex digit per cell and one line per grid row, then a blank line, the entry and
//! exit as `row,col` and the solution as a string of `N`, `E`, `S` and `W` moves. Every line,
//! including the last, ends in a newline.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use error_chain::bail;
use log::{debug, info};

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::SolutionPath;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MazeFile {
    pub grid: Grid,
    pub entry: GridCoordinate,
    pub exit: GridCoordinate,
    pub solution: SolutionPath,
}

impl MazeFile {
    pub fn new(grid: Grid, entry: GridCoordinate, exit: GridCoordinate, solution: SolutionPath) -> MazeFile {
        MazeFile { grid, entry, exit, solution }
    }

    /// Does the stored solution lead from the entry to the exit through open walls only?
    pub fn solution_is_valid(&self) -> bool {
        self.solution.is_walkable(&self.grid, self.entry) &&
        self.solution
            .cells(self.entry, self.grid.dimensions())
            .and_then(|cells| cells.last().cloned()) == Some(self.exit)
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string())
            .chain_err(|| format!("unable to write maze file {}", path.display()))?;
        info!("wrote {}x{} maze to {}", self.grid.width().0, self.grid.height().0, path.display());
        Ok(())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MazeFile> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .chain_err(|| format!("unable to read maze file {}", path.display()))?;
        let maze_file = text.parse::<MazeFile>()?;
        debug!("read {}x{} maze from {}",
               maze_file.grid.width().0,
               maze_file.grid.height().0,
               path.display());
        Ok(maze_file)
    }
}

impl fmt::Display for MazeFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.grid.to_hex_rows() {
            writeln!(f, "{}", row)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.entry)?;
        writeln!(f, "{}", self.exit)?;
        writeln!(f, "{}", self.solution)
    }
}

impl FromStr for MazeFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<MazeFile> {
        let mut lines = s.lines().map(|line| line.trim_end_matches('\r'));

        let hex_rows: Vec<&str> = lines.by_ref().take_while(|line| !line.trim().is_empty()).collect();
        if hex_rows.is_empty() {
            bail!(ErrorKind::MalformedMazeFile("no grid rows before the blank line".to_owned()));
        }
        let grid = Grid::from_hex_rows(&hex_rows[..])?;

        let entry = parse_endpoint(lines.next(), "entry")?;
        let exit = parse_endpoint(lines.next(), "exit")?;
        grid.dimensions().check_coordinate(entry)?;
        grid.dimensions().check_coordinate(exit)?;

        let solution = lines.next().unwrap_or("").parse::<SolutionPath>()?;
        if let Some(extra) = lines.find(|line| !line.trim().is_empty()) {
            bail!(ErrorKind::MalformedMazeFile(format!("unexpected trailing line {:?}", extra)));
        }

        Ok(MazeFile { grid, entry, exit, solution })
    }
}

fn parse_endpoint(line: Option<&str>, name: &str) -> Result<GridCoordinate> {
    let line = match line {
        Some(line) => line,
        None => bail!(ErrorKind::MalformedMazeFile(format!("missing {} line", name))),
    };
    line.parse::<GridCoordinate>().map_err(|e| {
        ErrorKind::MalformedMazeFile(format!("bad {} line {:?}: {}", name, line, e)).into()
    })
}
