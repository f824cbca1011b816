//! Maze engine: level files in, push moves resolved, cells drawn.

pub mod cell;
pub mod grid;
pub mod level;

pub use cell::{Appearance, Cell};
pub use grid::{Direction, Maze, MoveOutcome, Push};
pub use level::{Level, LevelError};
