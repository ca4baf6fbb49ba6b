//! **mazegen** generates perfect mazes with the recursive backtracker, optionally carving around a
//! reserved motif, and finds the route from entry to exit.

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_iterators;
pub mod masks;
pub mod maze;
pub mod maze_file;
pub mod pathing;
pub mod units;
mod utils;
