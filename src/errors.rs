//! Error types for the whole library.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types.
//! Other modules in this crate `use crate::errors::*;` to get access to everything.

#![allow(deprecated)] // error_chain still implements `Error::description`

use error_chain::*;

use crate::cells::GridCoordinate;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ParseInt(::std::num::ParseIntError);
    }

    errors {
        InvalidDimension(width: usize, height: usize) {
            description("grid dimensions below the minimum")
            display("invalid grid dimensions {}x{}: the minimum is {}x{}",
                    width, height,
                    crate::grid_dimensions::MIN_WIDTH, crate::grid_dimensions::MIN_HEIGHT)
        }

        OutOfBounds(coord: GridCoordinate, width: usize, height: usize) {
            description("coordinate outside the grid")
            display("coordinate {} is outside the {}x{} grid", coord, width, height)
        }

        CoincidentEndpoints(coord: GridCoordinate) {
            description("entry and exit are the same cell")
            display("entry and exit must differ, both are {}", coord)
        }

        Unreachable(start: GridCoordinate, end: GridCoordinate) {
            description("no path between two cells")
            display("no path from {} to {}", start, end)
        }

        InvalidConfig(reason: String) {
            description("invalid configuration")
            display("invalid configuration: {}", reason)
        }

        MalformedMazeFile(reason: String) {
            description("malformed maze file")
            display("malformed maze file: {}", reason)
        }
    }
}
