//! Game state machine, independent of the terminal.
//!
//!   Playing(i) --all shelves filled--> Won(i)
//!   Won(i)     --advance-->            Playing(i+1) | AllLevelsComplete
//!   Playing(i) --restart-->            Playing(i)   (level reloaded)
//!   Playing(i) --quit-->               Exiting
//!
//! AllLevelsComplete and Exiting are terminal.

use log::debug;

use crate::maze::{Direction, LevelError, Maze, MoveOutcome};

use super::levels::LevelSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    AllLevelsComplete,
    Exiting,
}

/// Result of leaving a won level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Advance {
    /// Now playing this (1-based) level.
    Next(usize),
    Finished,
}

pub struct Session {
    levels: LevelSet,
    maze: Maze,
    screen: (usize, usize),
    phase: Phase,
    solved: usize,
}

impl Session {
    /// Load the current level of `levels` for a screen of the given size.
    pub fn start(levels: LevelSet, screen_w: usize, screen_h: usize) -> Result<Self, LevelError> {
        let maze = Maze::load(levels.current_path(), screen_w, screen_h)?;
        Ok(Session {
            levels,
            maze,
            screen: (screen_w, screen_h),
            phase: Phase::Playing,
            solved: 0,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_number(&self) -> usize {
        self.levels.number()
    }

    /// Levels solved in this session.
    pub fn solved(&self) -> usize {
        self.solved
    }

    /// Move the hero. The level is won once every shelf holds a box.
    pub fn push(&mut self, dir: Direction) -> MoveOutcome {
        if self.phase != Phase::Playing {
            return MoveOutcome::Blocked;
        }
        let outcome = self.maze.resolve_move(dir);
        if self.maze.is_solved() {
            debug!("level {} solved", self.levels.number());
            self.phase = Phase::Won;
            self.solved += 1;
        }
        outcome
    }

    /// Reload the current level from its file.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.reload()?;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Go to the next level after a win.
    pub fn advance(&mut self) -> Result<Advance, LevelError> {
        if !self.levels.advance() {
            self.phase = Phase::AllLevelsComplete;
            return Ok(Advance::Finished);
        }
        self.reload()?;
        self.phase = Phase::Playing;
        Ok(Advance::Next(self.levels.number()))
    }

    pub fn quit(&mut self) {
        self.phase = Phase::Exiting;
    }

    /// The screen changed size; re-centre without touching the maze.
    pub fn resize(&mut self, screen_w: usize, screen_h: usize) {
        self.screen = (screen_w, screen_h);
        self.maze.recenter(screen_w, screen_h);
    }

    fn reload(&mut self) -> Result<(), LevelError> {
        let (w, h) = self.screen;
        self.maze = Maze::load(self.levels.current_path(), w, h)?;
        Ok(())
    }
}
