//! Optimal solver for the generalized sliding-tile puzzle.
//!
//! Boards are `k`×`k` with tiles `1..k*k` and a blank (`0`) whose goal cell is
//! configurable. Solutions are found with IDA* over the Manhattan distance,
//! mutating a single board in place.

pub mod input;
pub mod puzzle;
pub mod solver;

pub use input::{InputError, PuzzleInput};
pub use puzzle::{is_solvable, Move, Position, Puzzle};
pub use solver::{report, Solution};
