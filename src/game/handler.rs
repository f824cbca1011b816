//! Console-facing side of the game: key dispatch, score line, modal windows.

use std::thread;

use crossterm::event::KeyEvent;
use log::debug;

use crate::config::TimingConfig;
use crate::console::{ConsoleEvent, EventHandler, Flow, Ink, Screen};

use super::command::{command_for, is_yes, Command};
use super::session::{Advance, Phase, Session};

const WINDOW_FG: Ink = Ink::Blue;
const WINDOW_BG: Ink = Ink::White;
const WINDOW_HEIGHT: u16 = 5;

const MSG_SOLVED: &str = "YOU'VE SOLVED THE MAP!";
const MSG_ALL_DONE: &str = "-- YOU'VE PASSED ALL THE LEVELS! WELL DONE!!! --";
const ASK_RESTART: &str = "RESTART THE LEVEL? (Y/N)";
const ASK_EXIT: &str = "EXIT THE GAME? (Y/N)";
const HELP_LINE: &str = "<Q> EXIT  ::  <R> RESTART THE LEVEL";

/// How a game ended, for the report printed after the console is closed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Summary {
    pub solved: usize,
    pub last_level: usize,
    pub completed: bool,
}

pub struct Game {
    session: Session,
    timing: TimingConfig,
}

impl Game {
    pub fn new(session: Session, timing: TimingConfig) -> Self {
        Game { session, timing }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            solved: self.session.solved(),
            last_level: self.session.level_number(),
            completed: self.session.phase() == Phase::AllLevelsComplete,
        }
    }

    /// Clear and draw maze, score and help line.
    pub fn redraw(&mut self, screen: &mut dyn Screen) -> anyhow::Result<()> {
        self.sync_size(screen);
        screen.clear()?;
        self.session.maze().render(screen)?;
        self.draw_score(screen)?;
        screen.refresh()?;
        Ok(())
    }

    /// A prompt may have read a resize; levels must load against the
    /// current size.
    fn sync_size(&mut self, screen: &dyn Screen) {
        self.session.resize(screen.width() as usize, screen.height() as usize);
    }

    fn draw_score(&self, screen: &mut dyn Screen) -> anyhow::Result<()> {
        let maze = self.session.maze();
        let score = format!(
            "MAP {}  ::  BOXES {}  ::  SHELVES {}  ::  READY {}  ",
            self.session.level_number(), maze.boxes(), maze.shelves(), maze.shelfbox()
        );
        screen.print(0, 2, &score)?;
        screen.print(screen.height().saturating_sub(1), 2, HELP_LINE)?;
        Ok(())
    }

    /// Centred message box; waits for the next key.
    fn window(&self, screen: &mut dyn Screen, msg: &str) -> anyhow::Result<Option<KeyEvent>> {
        let width = msg.chars().count() as u16 + 4;
        let col = screen.width().saturating_sub(width) / 2;
        let row = screen.height().saturating_sub(WINDOW_HEIGHT) / 2;
        let blank = " ".repeat(width as usize);
        for i in 0..WINDOW_HEIGHT {
            screen.draw_text(row + i, col, &blank, WINDOW_FG, WINDOW_BG)?;
        }
        screen.draw_text(row + WINDOW_HEIGHT / 2, col + 2, msg, WINDOW_FG, WINDOW_BG)?;
        screen.refresh()?;

        match screen.poll_key(Some(true))? {
            ConsoleEvent::Key(key) => Ok(Some(key)),
            _ => Ok(None),
        }
    }

    fn confirm(&self, screen: &mut dyn Screen, question: &str) -> anyhow::Result<bool> {
        Ok(self.window(screen, question)?.is_some_and(is_yes))
    }

    /// Announce the win and move on. Stops the loop after the last level.
    fn finish_level(&mut self, screen: &mut dyn Screen) -> anyhow::Result<Flow> {
        thread::sleep(self.timing.win_pause);
        self.window(screen, MSG_SOLVED)?;
        self.sync_size(screen);
        match self.session.advance()? {
            Advance::Next(level) => {
                self.window(screen, &format!("> GOING TO MAP {level}! <"))?;
                self.redraw(screen)?;
                Ok(Flow::Continue)
            }
            Advance::Finished => {
                self.window(screen, MSG_ALL_DONE)?;
                Ok(Flow::Stop)
            }
        }
    }
}

impl EventHandler for Game {
    fn on_key(&mut self, screen: &mut dyn Screen, key: KeyEvent) -> anyhow::Result<Flow> {
        match command_for(key) {
            Command::Move(dir) => {
                if self.session.push(dir).accepted() {
                    self.session.maze().render(screen)?;
                }
                self.draw_score(screen)?;
                screen.refresh()?;
                if self.session.phase() == Phase::Won {
                    return self.finish_level(screen);
                }
            }
            Command::Restart => {
                if self.confirm(screen, ASK_RESTART)? {
                    debug!("restarting level {}", self.session.level_number());
                    self.sync_size(screen);
                    self.session.restart()?;
                }
                self.redraw(screen)?;
            }
            Command::Quit => {
                if self.confirm(screen, ASK_EXIT)? {
                    self.session.quit();
                    return Ok(Flow::Stop);
                }
                self.redraw(screen)?;
            }
            Command::Abort => {
                self.session.quit();
                return Ok(Flow::Stop);
            }
            Command::Ignore => {}
        }
        Ok(Flow::Continue)
    }

    fn on_resize(&mut self, screen: &mut dyn Screen, _rows: u16, _cols: u16) -> anyhow::Result<Flow> {
        self.redraw(screen)?;
        Ok(Flow::Continue)
    }
}
