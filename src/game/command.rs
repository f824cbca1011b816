//! Keyboard → game command.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::maze::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    /// Ask before restarting the level.
    Restart,
    /// Ask before leaving the game.
    Quit,
    /// Ctrl+C: leave without asking.
    Abort,
    Ignore,
}

const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_YES: &[KeyCode] = &[KeyCode::Char('y'), KeyCode::Char('Y')];

pub fn command_for(key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Command::Abort;
    }
    match key.code {
        KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Down => Command::Move(Direction::Down),
        code if KEYS_RESTART.contains(&code) => Command::Restart,
        code if KEYS_QUIT.contains(&code) => Command::Quit,
        _ => Command::Ignore,
    }
}

/// Answer to a (Y/N) prompt.
pub fn is_yes(key: KeyEvent) -> bool {
    KEYS_YES.contains(&key.code)
}
