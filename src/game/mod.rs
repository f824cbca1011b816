//! Game controller: level set, key mapping, state machine and the
//! console-facing handler that ties them together.

pub mod command;
pub mod handler;
pub mod levels;
pub mod session;

pub use command::Command;
pub use handler::{Game, Summary};
pub use levels::{LevelSet, LevelSetError};
pub use session::{Advance, Phase, Session};
