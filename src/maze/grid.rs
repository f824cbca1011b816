//! The maze in play: cells, hero, counters and the push rules.
//!
//! ## Move resolution
//!
//! `ahead` is the cell next to the hero in the move direction, `ahead2` the
//! one after it (absent past the border).
//!
//!   ahead      ahead2         effect
//!   Wall       -              rejected
//!   Space      -              hero steps
//!   Shelf      -              hero steps
//!   Box        Space          box slides, hero steps
//!   Box        Shelf          box lands on shelf, shelfbox += 1
//!   ShelfBox   Space          box leaves shelf, shelfbox -= 1
//!   ShelfBox   Shelf          box moves shelf to shelf, shelfbox unchanged
//!   anything else             rejected
//!
//! A rejected move changes nothing. Stepping off the grid is rejected before
//! `ahead` is looked at.

use std::io;
use std::path::Path;

use log::debug;

use crate::console::Canvas;

use super::cell::{Cell, HERO_LOOK};
use super::level::{self, Level, LevelError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// What a move did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Blocked,
    Walked,
    Pushed(Push),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Push {
    /// Box to space.
    Slid,
    /// Box onto a shelf.
    Shelved,
    /// Box off its shelf onto space.
    Unshelved,
    /// Box from one shelf onto the next.
    Reshelved,
}

impl MoveOutcome {
    pub fn accepted(self) -> bool {
        self != MoveOutcome::Blocked
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// `cells[y][x]`
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
    hero: (usize, usize),
    shelves: usize,
    boxes: usize,
    shelfbox: usize,
    /// Screen position of cell (0, 0). Negative once the screen is smaller
    /// than the maze.
    origin: (i64, i64),
}

impl Maze {
    /// Load a level that must fit a `screen_w` x `screen_h` screen, centred on it.
    pub fn load(path: &Path, screen_w: usize, screen_h: usize) -> Result<Maze, LevelError> {
        let level = level::load(path, screen_w, screen_h)?;
        debug!(
            "loaded {}: {}x{}, {} shelves",
            path.display(), level.width, level.height, level.shelves
        );
        Ok(Maze::new(level, screen_w, screen_h))
    }

    pub fn new(level: Level, screen_w: usize, screen_h: usize) -> Maze {
        let mut maze = Maze {
            cells: level.cells,
            width: level.width,
            height: level.height,
            hero: level.hero,
            shelves: level.shelves,
            boxes: level.boxes,
            shelfbox: level.shelfbox,
            origin: (0, 0),
        };
        maze.recenter(screen_w, screen_h);
        maze
    }

    // ── Queries ──

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn hero(&self) -> (usize, usize) { self.hero }
    pub fn shelves(&self) -> usize { self.shelves }
    pub fn boxes(&self) -> usize { self.boxes }
    pub fn shelfbox(&self) -> usize { self.shelfbox }
    pub fn origin(&self) -> (i64, i64) { self.origin }

    /// Cell at (x, y), `None` past the border.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn is_solved(&self) -> bool {
        self.shelfbox == self.shelves
    }

    // ── Moves ──

    fn step(&self, (x, y): (usize, usize), dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = usize::try_from(x as i64 + dx).ok()?;
        let ny = usize::try_from(y as i64 + dy).ok()?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    fn set(&mut self, (x, y): (usize, usize), cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Try to move the hero one cell, pushing a box if there is one.
    pub fn resolve_move(&mut self, dir: Direction) -> MoveOutcome {
        let Some(next) = self.step(self.hero, dir) else {
            return MoveOutcome::Blocked;
        };
        let ahead = self.cells[next.1][next.0];
        let far = self.step(next, dir);
        let ahead2 = far.map(|(x, y)| self.cells[y][x]);

        let outcome = match (ahead, ahead2, far) {
            (Cell::Space | Cell::Shelf, _, _) => MoveOutcome::Walked,
            (pushed, Some(beyond), Some(far)) if pushed.has_box() && beyond.takes_box() => {
                let from_shelf = pushed.is_shelf();
                let to_shelf = beyond.is_shelf();
                self.set(next, if from_shelf { Cell::Shelf } else { Cell::Space });
                self.set(far, if to_shelf { Cell::ShelfBox } else { Cell::Box });
                let push = match (from_shelf, to_shelf) {
                    (false, false) => Push::Slid,
                    (false, true) => {
                        self.shelfbox += 1;
                        Push::Shelved
                    }
                    (true, false) => {
                        self.shelfbox -= 1;
                        Push::Unshelved
                    }
                    (true, true) => Push::Reshelved,
                };
                MoveOutcome::Pushed(push)
            }
            _ => return MoveOutcome::Blocked,
        };

        self.hero = next;
        if let MoveOutcome::Pushed(push) = outcome {
            debug!("push {push:?} towards {dir:?}, ready {}/{}", self.shelfbox, self.shelves);
        }
        outcome
    }

    // ── Screen ──

    /// Centre the maze on a screen of the given size. The maze itself is
    /// untouched; parts may end up off-screen.
    pub fn recenter(&mut self, screen_w: usize, screen_h: usize) {
        self.origin = (
            (screen_w as i64 - self.width as i64).div_euclid(2),
            (screen_h as i64 - self.height as i64).div_euclid(2),
        );
    }

    /// Screen (row, col) of cell (x, y), `None` above or left of the screen.
    fn screen_pos(&self, x: usize, y: usize) -> Option<(u16, u16)> {
        let col = u16::try_from(self.origin.0 + x as i64).ok()?;
        let row = u16::try_from(self.origin.1 + y as i64).ok()?;
        Some((row, col))
    }

    /// Draw every cell, column by column, then the hero on top.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for x in 0..self.width {
            for y in 0..self.height {
                let Some((row, col)) = self.screen_pos(x, y) else { continue };
                let look = self.cells[y][x].appearance();
                canvas.draw_text(row, col, look.glyph.encode_utf8(&mut buf), look.fg, look.bg)?;
            }
        }
        let (hx, hy) = self.hero;
        if let Some((row, col)) = self.screen_pos(hx, hy) {
            canvas.draw_text(row, col, HERO_LOOK.glyph.encode_utf8(&mut buf), HERO_LOOK.fg, HERO_LOOK.bg)?;
        }
        Ok(())
    }
}
