//! Terminal Sokoban.
//!
//! - [`console`]: terminal session, colour pairs, input polling, event loop
//! - [`maze`]: level files, cells, push moves
//! - [`game`]: level set, key mapping, state machine, screen handler
//! - [`config`]: `config.toml`

pub mod config;
pub mod console;
pub mod game;
pub mod maze;
